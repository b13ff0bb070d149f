use super::cache::{Outcome, QueryKey};
use crate::api::QueryInferencesResponse;
use std::sync::Arc;
use tracing::debug;

/// What the table should show for the currently wanted page.
#[derive(Debug, Clone, Default)]
pub enum FetchState {
    /// No credential, nothing requested.
    #[default]
    Idle,
    Loading,
    Loaded(Arc<QueryInferencesResponse>),
    Failed(String),
}

impl FetchState {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Ok(page) => Self::Loaded(Arc::clone(page)),
            Err(error) => Self::Failed(error.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn data(&self) -> Option<&QueryInferencesResponse> {
        match self {
            Self::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Tracks which key the view currently wants and drops results for any
/// other key.
#[derive(Debug, Default)]
pub struct FetchSlot {
    wanted: Option<QueryKey>,
    state: FetchState,
}

impl FetchSlot {
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn wanted(&self) -> Option<&QueryKey> {
        self.wanted.as_ref()
    }

    /// Point the slot at `key`. Returns `true` when the caller should start
    /// a fetch; asking again for the key already loading or loaded does not.
    pub fn request(&mut self, key: QueryKey) -> bool {
        if self.wanted.as_ref() == Some(&key)
            && matches!(self.state, FetchState::Loading | FetchState::Loaded(_))
        {
            return false;
        }
        self.wanted = Some(key);
        self.state = FetchState::Loading;
        true
    }

    /// Refetch the wanted key regardless of its state.
    pub fn refresh(&mut self) -> Option<QueryKey> {
        let key = self.wanted.clone()?;
        self.state = FetchState::Loading;
        Some(key)
    }

    /// Record a finished fetch. Returns `false` when the result belongs to
    /// a key that is no longer wanted.
    pub fn complete(&mut self, key: &QueryKey, outcome: &Outcome) -> bool {
        if self.wanted.as_ref() != Some(key) {
            debug!(query = key.query(), "fetch.discard_stale_result");
            return false;
        }
        self.state = FetchState::from_outcome(outcome);
        true
    }

    pub fn reset(&mut self) {
        self.wanted = None;
        self.state = FetchState::Idle;
    }
}
