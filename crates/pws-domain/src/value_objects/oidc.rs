//! OpenID Connect wire types
//!
//! Shapes returned by the identity provider's discovery document and token
//! endpoint. Unknown token-endpoint fields are kept in `extra` so they can be
//! carried into the session record as provider claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Subset of the OIDC discovery document this core relies on
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Issuer identifier, matched against the `iss` claim
    pub issuer: String,
    /// Where the browser is sent to log in
    pub authorization_endpoint: String,
    /// Code exchange and refresh endpoint
    pub token_endpoint: String,
    /// RP-initiated logout endpoint, when the provider supports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_session_endpoint: Option<String>,
    /// Published signing keys
    pub jwks_uri: String,
    /// Userinfo endpoint, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userinfo_endpoint: Option<String>,
}

/// Successful token endpoint response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenSet {
    /// Signed JWT access token
    pub access_token: String,
    /// Usually `Bearer`
    #[serde(default)]
    pub token_type: Option<String>,
    /// Access token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Refresh token, absent for providers that do not issue one
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Refresh token lifetime in seconds (Keycloak extension)
    #[serde(default)]
    pub refresh_expires_in: Option<u64>,
    /// OIDC ID token, used as `id_token_hint` at logout
    #[serde(default)]
    pub id_token: Option<String>,
    /// Granted scopes
    #[serde(default)]
    pub scope: Option<String>,
    /// Any other fields the provider returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters of an authorization redirect
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationRequest {
    /// Opaque `state` value echoed back on callback
    pub state: String,
    /// Upstream identity provider hint (`kc_idp_hint`)
    pub idp_hint: Option<String>,
}
