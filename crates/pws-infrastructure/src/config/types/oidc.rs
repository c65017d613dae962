//! Identity provider configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_OIDC_HTTP_TIMEOUT_SECS, DEFAULT_OIDC_SCOPES};

/// OpenID Connect client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OidcConfig {
    /// `.well-known/openid-configuration` URL
    pub discovery_url: String,
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: Option<String>,
    /// Callback URL registered with the provider
    pub redirect_uri: String,
    /// Expected `aud` claim, defaults to `client_id`
    pub audience: Option<String>,
    /// Scopes requested at login
    pub scopes: Vec<String>,
    /// Provider HTTP timeout in seconds
    pub http_timeout_secs: u64,
    /// Clock skew tolerated on `exp`, in seconds
    pub jwks_leeway_secs: u64,
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            discovery_url: String::new(),
            client_id: String::new(),
            client_secret: None,
            redirect_uri: String::new(),
            audience: None,
            scopes: DEFAULT_OIDC_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            http_timeout_secs: DEFAULT_OIDC_HTTP_TIMEOUT_SECS,
            jwks_leeway_secs: 0,
        }
    }
}

impl OidcConfig {
    /// Audience tokens must carry
    pub fn audience(&self) -> &str {
        self.audience
            .as_deref()
            .filter(|a| !a.is_empty())
            .unwrap_or(&self.client_id)
    }

    /// Provider HTTP timeout
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
