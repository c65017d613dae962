//! HTTP routes
//!
//! | Path | Method | Tier | Description |
//! |------|--------|------|-------------|
//! | `/auth/login` | GET | none | Redirect to the identity provider |
//! | `/auth/callback` | GET | none | Code exchange and session creation |
//! | `/auth/logout` | GET | none | End the session, return the provider logout URL |
//! | `/auth/status` | GET | optional | Authentication status |
//! | `/auth/refresh` | POST | none | Force a token refresh |
//! | `/api/users/me` | GET | required | Current identity |
//! | `/api/pads/<id>/access` | GET | required | Pad access descriptor (owner or shared) |
//! | `/api/pads/<id>/sharing` | GET | required | Pad sharing list (owner only) |
//! | `/api/admin/status` | GET | admin | Boot migration outcome, store health, providers |
//! | `/health` | GET | none | Store connectivity |

pub mod admin;
pub mod auth;
pub mod health;
pub mod pads;
pub mod users;

use rocket::Route;

/// Routes mounted under `/auth`
pub fn auth_routes() -> Vec<Route> {
    rocket::routes![
        auth::login,
        auth::callback,
        auth::logout,
        auth::status,
        auth::refresh
    ]
}

/// Routes mounted under `/api`
pub fn api_routes() -> Vec<Route> {
    rocket::routes![
        users::me,
        pads::access,
        pads::sharing,
        admin::status
    ]
}

/// Routes mounted at the root
pub fn root_routes() -> Vec<Route> {
    rocket::routes![health::health]
}
