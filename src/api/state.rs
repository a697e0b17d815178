use std::sync::Arc;

use crate::services::{loader::Catalog, Recommender, SessionStore};

/// Shared application state.
///
/// The catalog is read-only after load; only the session store is written.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub sessions: SessionStore,
}

impl AppState {
    /// Creates state over a loaded catalog with no sessions yet
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            recommender: Recommender::new(catalog),
            sessions: SessionStore::new(),
        }
    }
}
