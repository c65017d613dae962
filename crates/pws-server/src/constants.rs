//! Server-specific constants
//!
//! Cookie names, login modes and response texts of the HTTP surface.

// ============================================================================
// COOKIES
// ============================================================================

/// Cookie carrying the OAuth `state` nonce between login and callback
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Lifetime of the OAuth state cookie in seconds
pub const OAUTH_STATE_MAX_AGE_SECS: i64 = 600;

// ============================================================================
// LOGIN MODES
// ============================================================================

/// Login opened in a popup window; the callback closes it
pub const LOGIN_MODE_POPUP: &str = "popup";

/// Login in the main window; the callback redirects to the frontend
pub const LOGIN_MODE_WEB: &str = "web";

/// Separator between mode and nonce in the OAuth `state` parameter
pub const STATE_SEPARATOR: char = '.';

// ============================================================================
// RESPONSES
// ============================================================================

/// Challenge sent with every 401
pub const WWW_AUTHENTICATE_BEARER: &str = "Bearer";

/// Page returned to a popup login window after a successful callback
pub const POPUP_CLOSE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Signed in</title></head>
  <body>
    <script>
      if (window.opener) {
        window.opener.postMessage({ type: "auth_complete" }, "*");
      }
      window.close();
    </script>
    <p>Signed in. You can close this window.</p>
  </body>
</html>
"#;

/// Refresh endpoint: request without a session cookie
pub const MSG_NO_SESSION: &str = "No session found";

/// Refresh endpoint: cookie names no stored session
pub const MSG_INVALID_SESSION: &str = "Invalid session";

/// Refresh endpoint: the provider rejected the refresh
pub const MSG_REFRESH_FAILED: &str = "Failed to refresh session";

/// Status endpoint: anonymous request
pub const MSG_NOT_AUTHENTICATED: &str = "Not authenticated";
