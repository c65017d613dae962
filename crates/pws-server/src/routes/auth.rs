//! Login, callback, logout, status and refresh

use chrono::Utc;
use pws_application::RefreshOutcome;
use pws_application::domain_services::redact_session_id;
use pws_domain::crypto::TokenGenerator;
use pws_domain::error::Error;
use pws_domain::value_objects::AuthorizationRequest;
use pws_domain::{Identity, SessionRecord};
use rocket::http::CookieJar;
use rocket::response::Redirect;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{Responder, State, get, post};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::constants::{
    LOGIN_MODE_POPUP, LOGIN_MODE_WEB, MSG_INVALID_SESSION, MSG_NO_SESSION,
    MSG_NOT_AUTHENTICATED, MSG_REFRESH_FAILED, POPUP_CLOSE_HTML, STATE_SEPARATOR,
};
use crate::error::ApiError;
use crate::guards::SessionCookie;
use crate::state::ServerState;

/// Response of the callback: popup close page or redirect
#[derive(Responder)]
pub enum CallbackResponse {
    /// Popup login finished
    Popup(RawHtml<&'static str>),
    /// Main-window login finished
    Redirect(Redirect),
}

/// Response of the logout: provider logout URL or redirect
#[derive(Responder)]
pub enum LogoutResponse {
    /// Session ended
    Json(Json<Value>),
    /// Nothing to end
    Redirect(Redirect),
}

/// Public part of the identity returned by `/auth/status`
#[derive(Debug, Serialize)]
pub struct StatusUser {
    /// Subject identifier
    pub id: String,
    /// Login name
    pub username: String,
    /// Email address
    pub email: String,
    /// Display name
    pub name: String,
}

impl From<&Identity> for StatusUser {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            name: identity.name.clone(),
        }
    }
}

/// `/auth/status` payload
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Whether the caller has a valid session
    pub authenticated: bool,
    /// Caller identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<StatusUser>,
    /// Seconds until the access token expires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Reason when not authenticated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// `/auth/refresh` payload
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// Seconds until the new access token expires
    pub expires_in: i64,
    /// Always true
    pub authenticated: bool,
}

fn redirect_to(url: &str) -> Redirect {
    Redirect::found(url.to_string())
}

/// Start a login: new session id, state nonce, redirect to the provider
#[get("/login?<popup>&<kc_idp_hint>")]
pub fn login(
    popup: Option<&str>,
    kc_idp_hint: Option<&str>,
    cookies: &CookieJar<'_>,
    state: &State<ServerState>,
) -> Result<Redirect, ApiError> {
    let mode = if popup.is_some_and(|p| matches!(p, "1" | "true")) {
        LOGIN_MODE_POPUP
    } else {
        LOGIN_MODE_WEB
    };
    let session_id = TokenGenerator::session_id();
    let nonce = TokenGenerator::state_nonce();

    let url = state
        .context
        .identity_provider()
        .authorization_url(&AuthorizationRequest {
            state: format!("{mode}{STATE_SEPARATOR}{nonce}"),
            idp_hint: kc_idp_hint.filter(|h| !h.is_empty()).map(str::to_string),
        })?;

    state.cookies.set_session(cookies, &session_id);
    state.cookies.set_oauth_state(cookies, &nonce);
    info!(session = %redact_session_id(&session_id), mode, "Login started");
    Ok(redirect_to(&url))
}

/// Finish a login: check state, exchange the code, store the session
#[get("/callback?<code>&<state>")]
pub async fn callback(
    code: Option<&str>,
    state: Option<&str>,
    cookies: &CookieJar<'_>,
    server: &State<ServerState>,
) -> Result<CallbackResponse, ApiError> {
    let expected_nonce = server.cookies.take_oauth_state(cookies);
    let session_id = server
        .cookies
        .session_id(cookies)
        .ok_or_else(|| Error::invalid_argument("callback without session cookie"))?;
    let code = code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| Error::invalid_argument("callback without code"))?;
    let (mode, nonce) = state
        .and_then(|s| s.split_once(STATE_SEPARATOR))
        .ok_or_else(|| Error::invalid_argument("callback with malformed state"))?;
    if expected_nonce.as_deref() != Some(nonce) {
        return Err(Error::invalid_argument("callback state does not match").into());
    }

    let context = &server.context;
    let mut tokens = context.identity_provider().exchange_code(code).await?;
    let claims = context.tokens().verify(&tokens.access_token).await?;
    tokens
        .expires_in
        .get_or_insert(context.tokens().settings().default_expires_in_secs);

    let now = Utc::now();
    let record = SessionRecord::from_token_set(session_id.as_str(), tokens, now);
    context
        .sessions()
        .set(&session_id, &record, record.store_ttl(now))
        .await?;

    let identity = Identity::from_claims(claims);
    let provisioner = context.provisioner();
    if let Err(e) = provisioner.ensure_user(&identity).await {
        warn!(user = %identity.id, error = %e, "User provisioning failed");
    } else if let Err(e) = provisioner.ensure_workspace(&identity).await {
        warn!(user = %identity.id, error = %e, "Workspace provisioning failed");
    }

    info!(
        session = %redact_session_id(&session_id),
        user = %identity.id,
        expires_in = record.expires_in(now),
        "Login completed"
    );

    if mode == LOGIN_MODE_POPUP {
        Ok(CallbackResponse::Popup(RawHtml(POPUP_CLOSE_HTML)))
    } else {
        Ok(CallbackResponse::Redirect(redirect_to(&server.frontend_url)))
    }
}

/// End the session and hand back the provider logout URL
#[get("/logout")]
pub async fn logout(
    cookies: &CookieJar<'_>,
    server: &State<ServerState>,
) -> Result<LogoutResponse, ApiError> {
    let session_id = server.cookies.session_id(cookies);
    server.cookies.clear_session(cookies);

    let Some(session_id) = session_id else {
        return Ok(LogoutResponse::Redirect(redirect_to(&server.frontend_url)));
    };
    let sessions = server.context.sessions();
    let Some(record) = sessions.get(&session_id).await? else {
        return Ok(LogoutResponse::Redirect(redirect_to(&server.frontend_url)));
    };
    sessions.delete(&session_id).await?;

    let logout_url = server
        .context
        .identity_provider()
        .logout_url(record.id_token.as_deref(), &server.frontend_url)?
        .unwrap_or_else(|| server.frontend_url.clone());

    info!(session = %redact_session_id(&session_id), "Logged out");
    Ok(LogoutResponse::Json(Json(json!({
        "status": "success",
        "logout_url": logout_url,
    }))))
}

/// Authentication status of the caller
///
/// Store or provider outages surface as 503 rather than as an anonymous
/// status, so clients do not drop a session that is still valid.
#[get("/status")]
pub async fn status(
    session: SessionCookie,
    cookies: &CookieJar<'_>,
    server: &State<ServerState>,
) -> Result<Json<StatusResponse>, ApiError> {
    let had_cookie = session.0.is_some();
    match server.context.auth().resolve(session.0.as_deref()).await {
        Ok(resolved) => Ok(Json(StatusResponse {
            authenticated: true,
            user: Some(StatusUser::from(&resolved.identity)),
            expires_in: Some(resolved.record.expires_in(Utc::now())),
            message: None,
        })),
        Err(e) if e.is_authentication_failure() => {
            if had_cookie {
                server.cookies.clear_session(cookies);
            }
            Ok(Json(StatusResponse {
                authenticated: false,
                user: None,
                expires_in: None,
                message: Some(MSG_NOT_AUTHENTICATED),
            }))
        }
        Err(e) => Err(e.into()),
    }
}

/// Refresh the session's tokens now
///
/// Concurrent calls for one session share a single upstream refresh.
#[post("/refresh")]
pub async fn refresh(
    session: SessionCookie,
    server: &State<ServerState>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let session_id = session
        .0
        .ok_or_else(|| ApiError::unauthorized(MSG_NO_SESSION))?;
    let record = server
        .context
        .sessions()
        .get(&session_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(MSG_INVALID_SESSION))?;

    match server.context.tokens().refresh(&session_id, &record).await? {
        RefreshOutcome::Refreshed(next) => Ok(Json(RefreshResponse {
            expires_in: next.expires_in(Utc::now()),
            authenticated: true,
        })),
        RefreshOutcome::Rejected => Err(ApiError::unauthorized(MSG_REFRESH_FAILED)),
    }
}
