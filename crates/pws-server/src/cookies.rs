//! Session and OAuth state cookies
//!
//! Both cookies are `path=/`, `HttpOnly`, `SameSite=Lax`, and `Secure`
//! unless disabled for plain-HTTP development. Removal cookies carry the
//! same attributes so browsers match and drop the original.

use pws_infrastructure::config::ServerConfig;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::time::Duration;

use crate::constants::{OAUTH_STATE_COOKIE, OAUTH_STATE_MAX_AGE_SECS};

/// Cookie attributes taken from the server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieSettings {
    /// Session cookie name
    pub name: String,
    /// Set the `Secure` attribute
    pub secure: bool,
}

impl CookieSettings {
    /// Settings from the `[server]` section
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.secure_cookies,
        }
    }

    fn build(&self, name: &str, value: String) -> Cookie<'static> {
        Cookie::build((name.to_string(), value))
            .path("/")
            .secure(self.secure)
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }

    /// Expired, empty cookie that deletes `name` in the browser
    pub fn removal(&self, name: &str) -> Cookie<'static> {
        let mut cookie = self.build(name, String::new());
        cookie.make_removal();
        cookie
    }

    /// Current session id, if the cookie is present and non-empty
    pub fn session_id(&self, jar: &CookieJar<'_>) -> Option<String> {
        jar.get(&self.name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Set the session cookie
    pub fn set_session(&self, jar: &CookieJar<'_>, session_id: &str) {
        jar.add(self.build(&self.name, session_id.to_string()));
    }

    /// Clear the session cookie
    pub fn clear_session(&self, jar: &CookieJar<'_>) {
        jar.remove(self.build(&self.name, String::new()));
    }

    /// Set the short-lived OAuth state cookie
    pub fn set_oauth_state(&self, jar: &CookieJar<'_>, nonce: &str) {
        let mut cookie = self.build(OAUTH_STATE_COOKIE, nonce.to_string());
        cookie.set_max_age(Duration::seconds(OAUTH_STATE_MAX_AGE_SECS));
        jar.add(cookie);
    }

    /// Read and clear the OAuth state cookie
    pub fn take_oauth_state(&self, jar: &CookieJar<'_>) -> Option<String> {
        let nonce = jar.get(OAUTH_STATE_COOKIE).map(|c| c.value().to_string());
        if nonce.is_some() {
            jar.remove(self.build(OAUTH_STATE_COOKIE, String::new()));
        }
        nonce
    }
}
