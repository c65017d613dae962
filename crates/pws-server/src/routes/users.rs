//! Current user

use pws_domain::Identity;
use rocket::get;
use rocket::serde::json::Json;

use crate::guards::AuthenticatedUser;

/// Full identity of the caller
#[get("/users/me")]
pub fn me(user: AuthenticatedUser) -> Json<Identity> {
    Json(user.into_inner())
}
