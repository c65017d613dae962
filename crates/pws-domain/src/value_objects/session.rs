//! Session record value object

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::oidc::TokenSet;
use crate::constants::DEFAULT_EXPIRES_IN_SECS;

/// Server-side session, persisted as JSON in the key-value store
///
/// `expires_at` always mirrors the access token's upstream expiry. The store
/// TTL may be longer when the provider reports a refresh window, so an
/// expired access token can still be refreshed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    /// Opaque session identifier, also the cookie value
    pub session_id: String,
    /// Current access token
    pub access_token: String,
    /// Refresh token, if the provider issued one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// ID token, kept for the logout hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Absolute expiry of the access token
    pub expires_at: DateTime<Utc>,
    /// Absolute expiry of the refresh token, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_expires_at: Option<DateTime<Utc>>,
    /// Remaining provider fields (token type, scope, session state)
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl SessionRecord {
    /// Build a fresh record from a code exchange
    pub fn from_token_set(
        session_id: impl Into<String>,
        tokens: TokenSet,
        now: DateTime<Utc>,
    ) -> Self {
        let expires_at = now + secs(tokens.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS));
        let refresh_expires_at = tokens.refresh_expires_in.map(|s| now + secs(s));
        let mut claims = tokens.extra;
        if let Some(token_type) = tokens.token_type {
            claims.insert("token_type".to_string(), Value::String(token_type));
        }
        if let Some(scope) = tokens.scope {
            claims.insert("scope".to_string(), Value::String(scope));
        }
        Self {
            session_id: session_id.into(),
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            id_token: tokens.id_token,
            expires_at,
            refresh_expires_at,
            claims,
        }
    }

    /// Build the record that replaces this one after a refresh
    ///
    /// Providers may omit the refresh or ID token on refresh; the previous
    /// values are kept in that case.
    pub fn refreshed(&self, tokens: TokenSet, now: DateTime<Utc>) -> Self {
        let previous_refresh = self.refresh_token.clone();
        let previous_id = self.id_token.clone();
        let mut next = Self::from_token_set(self.session_id.clone(), tokens, now);
        if next.refresh_token.is_none() {
            next.refresh_token = previous_refresh;
            next.refresh_expires_at = self.refresh_expires_at;
        }
        if next.id_token.is_none() {
            next.id_token = previous_id;
        }
        next
    }

    /// Whether the access token is expired, treating the last `margin` as expired
    pub fn is_expired_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        let margin = chrono::Duration::from_std(margin).unwrap_or(chrono::Duration::zero());
        now + margin >= self.expires_at
    }

    /// Seconds left before the access token expires, never negative
    pub fn expires_in(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_seconds().max(0)
    }

    /// TTL to mirror at the store layer
    ///
    /// Equal to the access token lifetime, extended to the refresh token
    /// lifetime when that one is longer. Never below one second.
    pub fn store_ttl(&self, now: DateTime<Utc>) -> Duration {
        let until = match self.refresh_expires_at {
            Some(refresh) if refresh > self.expires_at => refresh,
            _ => self.expires_at,
        };
        (until - now)
            .to_std()
            .unwrap_or(Duration::ZERO)
            .max(Duration::from_secs(1))
    }
}

/// Upper bound on lifetimes accepted from the provider (ten years)
const MAX_LIFETIME_SECS: u64 = 10 * 365 * 24 * 3600;

fn secs(value: u64) -> chrono::Duration {
    chrono::Duration::seconds(i64::try_from(value.min(MAX_LIFETIME_SECS)).unwrap_or(0))
}
