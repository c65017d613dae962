//! JSON catchers
//!
//! Guard failures and unmatched routes end here. A guard that failed with
//! a domain error left it in the request-local cache; the catcher renders
//! that error, otherwise a generic one for the status.

use rocket::http::Status;
use rocket::request::Request;
use rocket::{Catcher, catch, catchers};

use crate::error::ApiError;
use crate::guards::CachedGuardError;

fn cached_or(status: Status, request: &Request<'_>) -> ApiError {
    request
        .local_cache(|| CachedGuardError(None))
        .0
        .clone()
        .filter(|e| e.status() == status)
        .unwrap_or_else(|| ApiError::from_status(status))
}

#[catch(default)]
fn default_catcher(status: Status, request: &Request<'_>) -> ApiError {
    cached_or(status, request)
}

/// Catchers registered at the root
pub fn all() -> Vec<Catcher> {
    catchers![default_catcher]
}
