//! HTTP server configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FRONTEND_URL, DEFAULT_HTTP_HOST, DEFAULT_HTTP_PORT};
use pws_domain::constants::SESSION_COOKIE_NAME;

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
    /// Browser application, target of post-login and post-logout redirects
    pub frontend_url: String,
    /// Mark cookies `Secure` (disable only for plain-HTTP development)
    pub secure_cookies: bool,
    /// Name of the session cookie
    pub cookie_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HTTP_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            secure_cookies: true,
            cookie_name: SESSION_COOKIE_NAME.to_string(),
        }
    }
}
