//! Token claims and the identity derived from them

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::ADMIN_ROLE;

/// Realm-level role assignment (`realm_access` claim)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealmAccess {
    /// Granted realm roles
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Verified access token claims
///
/// Optional claims default to empty values so that a token from a provider
/// that omits them still yields a usable identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (stable user identifier)
    pub sub: String,
    /// Expiry as seconds since the Unix epoch
    pub exp: i64,
    /// Issued-at as seconds since the Unix epoch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: String,
    /// Whether the provider verified the email address
    #[serde(default)]
    pub email_verified: bool,
    /// Login name
    #[serde(default)]
    pub preferred_username: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// Realm roles
    #[serde(default)]
    pub realm_access: RealmAccess,
}

/// Read-only view of an authenticated user, rebuilt on every request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Stable subject identifier
    pub id: String,
    /// Email address
    pub email: String,
    /// Whether the email address is verified
    pub email_verified: bool,
    /// Login name
    pub username: String,
    /// Display name
    pub name: String,
    /// Given name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    /// Family name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    /// Realm roles
    pub roles: BTreeSet<String>,
    /// Derived from `roles`
    pub is_admin: bool,
    /// Access token expiry
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    /// Build the identity from verified claims
    pub fn from_claims(claims: Claims) -> Self {
        let roles: BTreeSet<String> = claims.realm_access.roles.into_iter().collect();
        let is_admin = roles.contains(ADMIN_ROLE);
        Self {
            id: claims.sub,
            email: claims.email,
            email_verified: claims.email_verified,
            username: claims.preferred_username,
            name: claims.name,
            given_name: claims.given_name,
            family_name: claims.family_name,
            roles,
            is_admin,
            expires_at: DateTime::<Utc>::from_timestamp(claims.exp, 0).unwrap_or_default(),
        }
    }

    /// Whether the identity carries `role`
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
