//! Token Lifecycle Manager
//!
//! Verifies access tokens against the provider's JWKS, decides when a
//! session's access token must be refreshed, and performs the refresh-token
//! exchange.
//!
//! ## Refresh coordination
//!
//! Refresh runs under a short per-session lock so that one expiry event
//! produces one call to the token endpoint, no matter how many requests or
//! processes observe it. The lock holder re-reads the record first and skips
//! the upstream call if someone else already refreshed it. Callers that lose
//! the race poll the record until the holder publishes the new token, the
//! session disappears, or the wait bound elapses.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Validation, decode, decode_header};
use pws_domain::constants::{DEFAULT_EXPIRES_IN_SECS, REFRESH_LOCK_KEY_PREFIX};
use pws_domain::error::{Error, Result};
use pws_domain::ports::{IdentityProvider, LockProvider};
use pws_domain::{Claims, SessionRecord};
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use super::jwks::JwksCache;
use super::session_store::{SessionStore, redact_session_id};

/// Tunables of the token lifecycle
#[derive(Debug, Clone)]
pub struct TokenLifecycleSettings {
    /// Expected `aud` claim
    pub audience: String,
    /// Tokens within this window of their expiry count as expired
    pub expiry_margin: Duration,
    /// TTL of the per-session refresh lock
    pub refresh_lock_ttl: Duration,
    /// How long a caller waits for a concurrent refresh
    pub refresh_wait: Duration,
    /// Poll interval while waiting for a concurrent refresh
    pub refresh_poll: Duration,
    /// Clock skew tolerated when checking `exp`
    pub leeway_secs: u64,
    /// Access token lifetime assumed when the provider omits `expires_in`
    pub default_expires_in_secs: u64,
}

impl TokenLifecycleSettings {
    /// Settings with default timings for the given audience
    pub fn new(audience: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            expiry_margin: Duration::from_secs(30),
            refresh_lock_ttl: Duration::from_secs(15),
            refresh_wait: Duration::from_secs(5),
            refresh_poll: Duration::from_millis(100),
            leeway_secs: 0,
            default_expires_in_secs: DEFAULT_EXPIRES_IN_SECS,
        }
    }
}

/// Result of a refresh attempt
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The session now holds fresh tokens
    Refreshed(SessionRecord),
    /// The provider rejected the refresh token, or the session is gone;
    /// the session has been deleted and the user must log in again
    Rejected,
}

impl RefreshOutcome {
    /// Whether the refresh succeeded
    pub fn success(&self) -> bool {
        matches!(self, Self::Refreshed(_))
    }

    /// The refreshed record, if any
    pub fn into_record(self) -> Option<SessionRecord> {
        match self {
            Self::Refreshed(record) => Some(record),
            Self::Rejected => None,
        }
    }
}

/// Verification, expiry detection and refresh of session tokens
pub struct TokenLifecycleManager {
    provider: Arc<dyn IdentityProvider>,
    sessions: Arc<SessionStore>,
    locks: Arc<dyn LockProvider>,
    jwks: JwksCache,
    settings: TokenLifecycleSettings,
}

impl TokenLifecycleManager {
    /// Create a manager
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        sessions: Arc<SessionStore>,
        locks: Arc<dyn LockProvider>,
        settings: TokenLifecycleSettings,
    ) -> Self {
        Self {
            jwks: JwksCache::new(Arc::clone(&provider)),
            provider,
            sessions,
            locks,
            settings,
        }
    }

    /// Signing key cache
    pub fn jwks(&self) -> &JwksCache {
        &self.jwks
    }

    /// Active settings
    pub fn settings(&self) -> &TokenLifecycleSettings {
        &self.settings
    }

    /// Verify an access token and return its claims
    ///
    /// # Errors
    /// * `TokenExpired` - signature fine but `exp` has passed
    /// * `InvalidToken` - malformed, unknown key, bad signature, audience or issuer
    pub async fn verify(&self, access_token: &str) -> Result<Claims> {
        let header = decode_header(access_token)
            .map_err(|e| Error::invalid_token_with_source("malformed token header", e))?;
        let key = self
            .jwks
            .decoding_key(header.kid.as_deref(), header.alg)
            .await?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[self.settings.audience.as_str()]);
        validation.set_issuer(&[self.provider.metadata().issuer.as_str()]);
        validation.leeway = self.settings.leeway_secs;

        match decode::<Claims>(access_token, &key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(Error::TokenExpired),
            Err(e) => Err(Error::invalid_token_with_source(
                "token verification failed",
                e,
            )),
        }
    }

    /// Whether the record's access token is expired or about to be
    pub fn is_expired(&self, record: &SessionRecord) -> bool {
        record.is_expired_at(Utc::now(), self.settings.expiry_margin)
    }

    /// Refresh the session's tokens
    ///
    /// `observed` is the record the caller read. If the stored access token
    /// already differs from it, the session was refreshed concurrently and
    /// the stored record is returned without contacting the provider.
    ///
    /// # Errors
    /// `UpstreamUnavailable` when the store or provider cannot be reached, or
    /// a concurrent refresh did not finish within the wait bound. The session
    /// is left untouched in that case.
    pub async fn refresh(&self, session_id: &str, observed: &SessionRecord) -> Result<RefreshOutcome> {
        let lock_key = format!("{REFRESH_LOCK_KEY_PREFIX}{session_id}");
        let deadline = Instant::now() + self.settings.refresh_wait;

        loop {
            if let Some(lock) = self
                .locks
                .try_acquire(&lock_key, self.settings.refresh_lock_ttl)
                .await?
            {
                let outcome = self.refresh_as_holder(session_id, observed).await;
                match self.locks.release(&lock).await {
                    Ok(true) => {}
                    Ok(false) => warn!(
                        session = %redact_session_id(session_id),
                        "Refresh lock expired before release"
                    ),
                    Err(e) => warn!(
                        session = %redact_session_id(session_id),
                        error = %e,
                        "Failed to release refresh lock"
                    ),
                }
                return outcome;
            }

            debug!(
                session = %redact_session_id(session_id),
                "Refresh already in progress, waiting for it"
            );
            if let Some(outcome) = self
                .wait_for_refresh(session_id, observed, &lock_key, deadline)
                .await?
            {
                return Ok(outcome);
            }
        }
    }

    /// Poll until the holder publishes, the session vanishes or the lock frees
    ///
    /// Returns `None` when the lock was released without a new token, so the
    /// caller should try to take the lock itself.
    async fn wait_for_refresh(
        &self,
        session_id: &str,
        observed: &SessionRecord,
        lock_key: &str,
        deadline: Instant,
    ) -> Result<Option<RefreshOutcome>> {
        loop {
            if Instant::now() >= deadline {
                return Err(Error::upstream_unavailable(
                    "timed out waiting for concurrent session refresh",
                ));
            }
            sleep(self.settings.refresh_poll).await;

            match self.sessions.get(session_id).await? {
                None => return Ok(Some(RefreshOutcome::Rejected)),
                Some(current) if current.access_token != observed.access_token => {
                    return Ok(Some(RefreshOutcome::Refreshed(current)));
                }
                Some(_) => {}
            }

            if !self.locks.is_held(lock_key).await? {
                return Ok(None);
            }
        }
    }

    async fn refresh_as_holder(
        &self,
        session_id: &str,
        observed: &SessionRecord,
    ) -> Result<RefreshOutcome> {
        let Some(current) = self.sessions.get(session_id).await? else {
            return Ok(RefreshOutcome::Rejected);
        };
        if current.access_token != observed.access_token {
            debug!(
                session = %redact_session_id(session_id),
                "Session refreshed concurrently, reusing stored tokens"
            );
            return Ok(RefreshOutcome::Refreshed(current));
        }

        let Some(refresh_token) = current.refresh_token.as_deref() else {
            info!(
                session = %redact_session_id(session_id),
                "Session has no refresh token, ending it"
            );
            self.sessions.delete(session_id).await?;
            return Ok(RefreshOutcome::Rejected);
        };

        match self.provider.refresh_token(refresh_token).await {
            Ok(mut tokens) => {
                tokens
                    .expires_in
                    .get_or_insert(self.settings.default_expires_in_secs);
                let now = Utc::now();
                let next = current.refreshed(tokens, now);
                if self
                    .sessions
                    .replace(session_id, &next, next.store_ttl(now))
                    .await?
                {
                    info!(
                        session = %redact_session_id(session_id),
                        expires_in = next.expires_in(now),
                        "Session refreshed"
                    );
                    Ok(RefreshOutcome::Refreshed(next))
                } else {
                    info!(
                        session = %redact_session_id(session_id),
                        "Session ended during refresh"
                    );
                    Ok(RefreshOutcome::Rejected)
                }
            }
            Err(e) if e.is_authentication_failure() => {
                warn!(
                    session = %redact_session_id(session_id),
                    error = %e,
                    "Refresh token rejected, ending session"
                );
                self.sessions.delete(session_id).await?;
                Ok(RefreshOutcome::Rejected)
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for TokenLifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenLifecycleManager")
            .field("provider", &self.provider.provider_name())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
