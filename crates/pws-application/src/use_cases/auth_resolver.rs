//! Auth Resolver
//!
//! Turns a session cookie value into a verified [`Identity`]. The three
//! access tiers share one pipeline:
//!
//! ```text
//! cookie → SessionStore.get → is_expired? → refresh → verify → Identity
//! ```
//!
//! An expired but refreshable token is handled here and never reaches the
//! caller as an error. A successful refresh is persisted before the identity
//! is returned, so concurrent and later requests see the new token.

use std::sync::Arc;

use pws_domain::error::{Error, Result};
use pws_domain::{Identity, SessionRecord};
use tracing::{debug, warn};

use crate::domain_services::{
    RefreshOutcome, SessionStore, TokenLifecycleManager, redact_session_id,
};

/// Identity together with the session record it was derived from
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    /// Verified identity
    pub identity: Identity,
    /// Current (possibly just refreshed) session record
    pub record: SessionRecord,
}

/// Per-request authentication pipeline
#[derive(Debug)]
pub struct AuthResolver {
    sessions: Arc<SessionStore>,
    tokens: Arc<TokenLifecycleManager>,
}

impl AuthResolver {
    /// Create a resolver
    pub fn new(sessions: Arc<SessionStore>, tokens: Arc<TokenLifecycleManager>) -> Self {
        Self { sessions, tokens }
    }

    /// Optional tier: the identity if there is a valid session, otherwise `None`
    ///
    /// Never fails. Infrastructure errors are logged at warn level so an
    /// outage stays visible even though the caller sees an anonymous request.
    pub async fn optional(&self, session_id: Option<&str>) -> Option<Identity> {
        match self.resolve(session_id).await {
            Ok(resolved) => Some(resolved.identity),
            Err(e) if e.is_authentication_failure() => None,
            Err(e) => {
                warn!(error = %e, "Could not resolve optional session");
                None
            }
        }
    }

    /// Required tier: the identity, or `Unauthenticated`
    pub async fn required(&self, session_id: Option<&str>) -> Result<Identity> {
        self.resolve(session_id).await.map(|r| r.identity)
    }

    /// Admin tier: as [`required`](Self::required), then `Forbidden` unless admin
    pub async fn admin(&self, session_id: Option<&str>) -> Result<Identity> {
        let identity = self.required(session_id).await?;
        if identity.is_admin {
            Ok(identity)
        } else {
            Err(Error::forbidden("admin role required"))
        }
    }

    /// Full pipeline, returning the session record alongside the identity
    pub async fn resolve(&self, session_id: Option<&str>) -> Result<ResolvedSession> {
        let session_id = session_id
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::unauthenticated("no session cookie"))?;

        let mut record = self
            .sessions
            .get(session_id)
            .await?
            .ok_or_else(|| Error::unauthenticated("session not found"))?;

        if self.tokens.is_expired(&record) {
            debug!(session = %redact_session_id(session_id), "Access token expired, refreshing");
            record = self.refresh_or_fail(session_id, &record).await?;
        }

        let claims = match self.tokens.verify(&record.access_token).await {
            Ok(claims) => claims,
            // The record said the token was fresh but the token disagrees.
            Err(Error::TokenExpired) => {
                record = self.refresh_or_fail(session_id, &record).await?;
                self.tokens
                    .verify(&record.access_token)
                    .await
                    .map_err(|e| match e {
                        Error::TokenExpired => {
                            Error::unauthenticated("token still expired after refresh")
                        }
                        other => other,
                    })?
            }
            Err(e) => return Err(e),
        };

        Ok(ResolvedSession {
            identity: Identity::from_claims(claims),
            record,
        })
    }

    /// Refresh a session, turning a rejected refresh into `Unauthenticated`
    pub async fn refresh_or_fail(
        &self,
        session_id: &str,
        record: &SessionRecord,
    ) -> Result<SessionRecord> {
        match self.tokens.refresh(session_id, record).await? {
            RefreshOutcome::Refreshed(next) => Ok(next),
            RefreshOutcome::Rejected => Err(Error::unauthenticated("session expired")),
        }
    }

    /// Session store used by this resolver
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Token lifecycle manager used by this resolver
    pub fn tokens(&self) -> &Arc<TokenLifecycleManager> {
        &self.tokens
    }
}
