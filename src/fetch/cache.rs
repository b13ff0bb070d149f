use crate::actions::{Credential, Session};
use crate::api::{QueryInferencesParams, QueryInferencesResponse};
use crate::error::ApiError;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::debug;

/// Shared result of one fetch. Errors are reference counted because every
/// caller waiting on the same key receives the same failure.
pub type Outcome = Result<Arc<QueryInferencesResponse>, Arc<ApiError>>;

/// Identity of one inference page: who asked, where, and with which
/// canonical query string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    base_url: String,
    credential: Credential,
    query: String,
}

impl QueryKey {
    pub fn new(session: &Session, params: &QueryInferencesParams) -> Self {
        Self {
            base_url: session.base_url().to_string(),
            credential: session.credential().clone(),
            query: params.to_query_string(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Default)]
struct Entry {
    cell: OnceCell<(Outcome, Instant)>,
}

impl Entry {
    /// In-flight entries are never stale.
    fn is_stale(&self, stale_after: Duration) -> bool {
        self.cell
            .get()
            .is_some_and(|(_, completed_at)| completed_at.elapsed() >= stale_after)
    }
}

/// Keyed request de-duplication for inference pages.
///
/// At most one fetch per key runs at a time; callers arriving while it is
/// outstanding await the same result. Successful pages are reused until
/// `stale_after` has elapsed, failures are dropped as soon as they complete.
pub struct QueryCache {
    entries: Mutex<HashMap<QueryKey, Arc<Entry>>>,
    stale_after: Duration,
}

impl QueryCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_after,
        }
    }

    /// Return the cached or in-flight outcome for `key`, or run `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, key: &QueryKey, fetch: F) -> Outcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<QueryInferencesResponse, ApiError>>,
    {
        let entry = self.entry_for(key);

        let (outcome, _) = entry
            .cell
            .get_or_init(|| async move {
                let outcome = fetch().await.map(Arc::new).map_err(Arc::new);
                (outcome, Instant::now())
            })
            .await;
        let outcome = outcome.clone();

        if outcome.is_err() {
            self.evict_if_current(key, &entry);
        }
        outcome
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Stale entries for every key are dropped here, so the map only holds
    /// in-flight and fresh pages.
    fn entry_for(&self, key: &QueryKey) -> Arc<Entry> {
        let mut entries = self.lock();
        entries.retain(|_, entry| !entry.is_stale(self.stale_after));
        if let Some(entry) = entries.get(key) {
            debug!(query = key.query(), "fetch.cache_hit");
            return Arc::clone(entry);
        }
        let entry = Arc::new(Entry::default());
        entries.insert(key.clone(), Arc::clone(&entry));
        entry
    }

    /// A newer entry may already have replaced the failed one.
    fn evict_if_current(&self, key: &QueryKey, entry: &Arc<Entry>) {
        let mut entries = self.lock();
        if entries
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, entry))
        {
            entries.remove(key);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Arc<Entry>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}
