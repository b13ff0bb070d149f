//! Keyed fetching of inference pages for the table.

pub mod cache;
pub mod state;

pub use cache::{Outcome, QueryCache, QueryKey};
pub use state::{FetchSlot, FetchState};

use crate::actions::{self, Session};
use crate::api::QueryInferencesParams;
use crate::filters::InferenceFilters;
use std::sync::Arc;
use std::time::Duration;

/// Binds applied filters to the shared cache.
#[derive(Clone)]
pub struct InferencesQuery {
    cache: Arc<QueryCache>,
}

impl InferencesQuery {
    pub fn new(cache: Arc<QueryCache>) -> Self {
        Self { cache }
    }

    pub fn with_stale_after(stale_after: Duration) -> Self {
        Self::new(Arc::new(QueryCache::new(stale_after)))
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// `None` while there is no session; nothing is fetched in that case.
    pub fn key_for(session: Option<&Session>, filters: &InferenceFilters) -> Option<QueryKey> {
        session.map(|session| QueryKey::new(session, &filters.to_query_params()))
    }

    /// Fetch (or join) the page for `params`.
    pub async fn load(
        &self,
        session: &Session,
        params: &QueryInferencesParams,
    ) -> (QueryKey, Outcome) {
        let key = QueryKey::new(session, params);
        let outcome = self
            .cache
            .get_or_fetch(&key, || actions::get_inferences(session, params))
            .await;
        (key, outcome)
    }

    /// Fetch the page the applied filters describe.
    pub async fn fetch(
        &self,
        session: Option<&Session>,
        filters: &InferenceFilters,
    ) -> FetchState {
        let Some(session) = session else {
            return FetchState::Idle;
        };
        let (_, outcome) = self.load(session, &filters.to_query_params()).await;
        FetchState::from_outcome(&outcome)
    }
}

impl Default for InferencesQuery {
    fn default() -> Self {
        Self::new(Arc::new(QueryCache::default()))
    }
}
