use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::{middleware::session::SessionId, models::SessionState};

/// Per-user interaction state, keyed by session id.
///
/// Entries are created lazily on first write and are never shared between
/// ids. Reads of an unknown id see a fresh default state. Sessions idle for
/// longer than the configured TTL are dropped by [`SessionStore::spawn_sweeper`].
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<DashMap<SessionId, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the session's state
    pub fn get(&self, id: &SessionId) -> SessionState {
        self.sessions
            .get(id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Applies `f` to the session's state in place and returns its result
    pub fn update<R>(&self, id: SessionId, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut entry = self.sessions.entry(id).or_default();
        f(entry.value_mut())
    }

    /// Drops sessions not updated within `max_idle`; returns how many went
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let max_idle = TimeDelta::from_std(max_idle).unwrap_or(TimeDelta::MAX);
        let Some(cutoff) = Utc::now().checked_sub_signed(max_idle) else {
            return 0;
        };

        let before = self.sessions.len();
        self.sessions.retain(|_, state| state.updated_at >= cutoff);
        before.saturating_sub(self.sessions.len())
    }

    /// Spawns a background task that evicts idle sessions every `period`
    pub fn spawn_sweeper(&self, max_idle: Duration, period: Duration) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            tracing::info!(
                ttl_secs = max_idle.as_secs(),
                period_secs = period.as_secs(),
                "Session sweeper started"
            );
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = store.evict_idle(max_idle);
                if evicted > 0 {
                    tracing::debug!(evicted, remaining = store.len(), "Evicted idle sessions");
                }
            }
        })
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
