//! Request guards for the three access tiers
//!
//! | Guard | Tier | Failure |
//! |-------|------|---------|
//! | [`OptionalUser`] | optional | never fails |
//! | [`AuthenticatedUser`] | required | 401 |
//! | [`AdminUser`] | admin-required | 401, then 403 |
//!
//! A failing guard caches its [`ApiError`] in the request-local cache so
//! the catchers can render the same body, headers and cookie removal a
//! handler error would get.
//!
//! ```rust,ignore
//! #[get("/users/me")]
//! fn me(user: AuthenticatedUser) -> Json<Identity> {
//!     Json(user.into_inner())
//! }
//! ```

use std::sync::Arc;

use pws_domain::Identity;
use pws_domain::error::Result;
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::error::ApiError;
use crate::state::ServerState;

/// Guard failure remembered for the catchers
#[derive(Debug, Default)]
pub(crate) struct CachedGuardError(pub(crate) Option<ApiError>);

fn fail<T>(request: &Request<'_>, error: ApiError) -> request::Outcome<T, ApiError> {
    let cached = request.local_cache(|| CachedGuardError(Some(error.clone())));
    let error = cached.0.clone().unwrap_or(error);
    Outcome::Error((error.status(), error))
}

fn server_state<'r>(request: &'r Request<'_>) -> Option<&'r ServerState> {
    request.rocket().state::<ServerState>()
}

fn missing_state<T>(request: &Request<'_>) -> request::Outcome<T, ApiError> {
    fail(
        request,
        ApiError::from_status(Status::InternalServerError),
    )
}

/// Raw session cookie value, if any
#[derive(Debug, Clone)]
pub struct SessionCookie(pub Option<String>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionCookie {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let Some(state) = server_state(request) else {
            return missing_state(request);
        };
        Outcome::Success(Self(state.cookies.session_id(request.cookies())))
    }
}

async fn resolve<'r, T, F, Fut>(request: &'r Request<'_>, tier: F) -> request::Outcome<T, ApiError>
where
    F: FnOnce(Arc<pws_application::AuthResolver>, Option<String>) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let Some(state) = server_state(request) else {
        return missing_state(request);
    };
    let session_id = state.cookies.session_id(request.cookies());
    match tier(state.context.auth(), session_id).await {
        Ok(value) => Outcome::Success(value),
        Err(e) => fail(request, ApiError::from(e)),
    }
}

/// Identity when a valid session exists
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Identity>);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalUser {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        resolve(request, |auth, sid| async move {
            Ok(Self(auth.optional(sid.as_deref()).await))
        })
        .await
    }
}

/// Identity of an authenticated caller
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl AuthenticatedUser {
    /// The identity
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        resolve(request, |auth, sid| async move {
            auth.required(sid.as_deref()).await.map(Self)
        })
        .await
    }
}

/// Identity of an authenticated admin
#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

impl AdminUser {
    /// The identity
    pub fn into_inner(self) -> Identity {
        self.0
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = ApiError;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        resolve(request, |auth, sid| async move {
            auth.admin(sid.as_deref()).await.map(Self)
        })
        .await
    }
}
