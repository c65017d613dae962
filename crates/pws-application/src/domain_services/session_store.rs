//! Session Store
//!
//! CRUD over [`SessionRecord`]s in the shared key-value store. Each call is a
//! single round-trip with no local caching, so every process sees the same
//! record. A store failure is returned as an error and never folded into
//! "no session".

use std::sync::Arc;
use std::time::Duration;

use pws_domain::constants::SESSION_KEY_PREFIX;
use pws_domain::error::Result;
use pws_domain::ports::KeyValueStore;
use pws_domain::SessionRecord;
use tracing::warn;

/// Shortened session identifier safe to put in logs
pub fn redact_session_id(session_id: &str) -> String {
    let prefix: String = session_id.chars().take(6).collect();
    format!("{prefix}...")
}

/// Session persistence over the shared key-value store
#[derive(Debug, Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    /// Create a session store over `store`
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(session_id: &str) -> String {
        format!("{SESSION_KEY_PREFIX}{session_id}")
    }

    /// Load a session
    ///
    /// A record that no longer deserializes is removed and reported as absent,
    /// so the user is sent through login again instead of failing forever.
    pub async fn get(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let key = Self::key(session_id);
        let Some(raw) = self.store.get(&key).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(
                    session = %redact_session_id(session_id),
                    error = %e,
                    "Discarding unreadable session record"
                );
                self.store.delete(&key).await?;
                Ok(None)
            }
        }
    }

    /// Store a session with the given TTL
    pub async fn set(&self, session_id: &str, record: &SessionRecord, ttl: Duration) -> Result<()> {
        let value = serde_json::to_string(record)?;
        self.store.set(&Self::key(session_id), &value, ttl).await
    }

    /// Overwrite an existing session, leaving deleted sessions deleted
    ///
    /// # Returns
    ///
    /// `false` when the session no longer exists (logged out or expired)
    pub async fn replace(
        &self,
        session_id: &str,
        record: &SessionRecord,
        ttl: Duration,
    ) -> Result<bool> {
        let value = serde_json::to_string(record)?;
        self.store
            .set_if_present(&Self::key(session_id), &value, ttl)
            .await
    }

    /// Delete a session
    ///
    /// # Returns
    ///
    /// `true` when a session was removed
    pub async fn delete(&self, session_id: &str) -> Result<bool> {
        self.store.delete(&Self::key(session_id)).await
    }
}
