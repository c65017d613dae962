//! Boundary error mapping
//!
//! Every domain error leaving a handler or a request guard becomes an
//! [`ApiError`]: a status code, the error kind and a generic message. The
//! full error is logged here and never reaches the client.
//!
//! | Error | Status |
//! |-------|--------|
//! | `Unauthenticated`, `InvalidToken`, `TokenExpired` | 401, session cookie cleared |
//! | `Forbidden` | 403 |
//! | `NotFound` | 404 |
//! | `InvalidArgument` | 400 |
//! | `UpstreamUnavailable`, `LockTimeout` | 503 |
//! | `BadUpstreamResponse` | 502 |
//! | anything else | 500 |

use std::io::Cursor;

use pws_domain::constants::SESSION_COOKIE_NAME;
use pws_domain::error::Error;
use rocket::http::{ContentType, Header, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};
use serde::Serialize;
use tracing::{error, warn};

use crate::constants::WWW_AUTHENTICATE_BEARER;
use crate::cookies::CookieSettings;
use crate::state::ServerState;

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Error kind, e.g. `unauthenticated`
    pub error: String,
    /// Generic, client-safe message
    pub message: String,
}

/// Error returned at the HTTP boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: Status,
    kind: String,
    message: String,
    clear_session: bool,
}

impl ApiError {
    /// Error with an explicit status, kind and message
    pub fn new(status: Status, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            kind: kind.into(),
            message: message.into(),
            clear_session: status == Status::Unauthorized,
        }
    }

    /// 401 with a specific client-facing message
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(Status::Unauthorized, "unauthenticated", message)
    }

    /// Fallback for a bare status, used by catchers
    pub fn from_status(status: Status) -> Self {
        let kind = match status.code {
            400 => "invalid_argument",
            401 => "unauthenticated",
            403 => "forbidden",
            404 => "not_found",
            422 => "invalid_argument",
            502 => "bad_upstream_response",
            503 => "upstream_unavailable",
            _ => "internal",
        };
        Self::new(status, kind, generic_message(status))
    }

    /// Replace the client-facing message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// HTTP status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Error kind
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Client-facing message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the response clears the session cookie
    pub fn clears_session(&self) -> bool {
        self.clear_session
    }

    /// Response body
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.kind.clone(),
            message: self.message.clone(),
        }
    }
}

/// Status for a domain error
pub fn status_for(error: &Error) -> Status {
    match error {
        Error::Unauthenticated { .. } | Error::InvalidToken { .. } | Error::TokenExpired => {
            Status::Unauthorized
        }
        Error::Forbidden { .. } => Status::Forbidden,
        Error::NotFound { .. } => Status::NotFound,
        Error::InvalidArgument { .. } => Status::BadRequest,
        Error::UpstreamUnavailable { .. } | Error::LockTimeout { .. } => {
            Status::ServiceUnavailable
        }
        Error::BadUpstreamResponse { .. } => Status::BadGateway,
        _ => Status::InternalServerError,
    }
}

fn generic_message(status: Status) -> &'static str {
    match status.code {
        400 | 422 => "Invalid request",
        401 => "Authentication required",
        403 => "Not authorized",
        404 => "Not found",
        502 => "Identity provider returned an invalid response",
        503 => "Service temporarily unavailable",
        _ => "Internal server error",
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let status = status_for(&error);
        if status.code >= 500 {
            error!(status = status.code, kind = error.kind(), error = %error, "Request failed");
        } else {
            warn!(status = status.code, kind = error.kind(), error = %error, "Request rejected");
        }
        Self::new(status, error.kind(), generic_message(status))
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let body = serde_json::to_string(&self.body()).map_err(|e| {
            error!(error = %e, "Failed to serialize error body");
            Status::InternalServerError
        })?;

        let mut response = Response::build();
        response
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(body.len(), Cursor::new(body));

        if self.status == Status::Unauthorized {
            response.header(Header::new("WWW-Authenticate", WWW_AUTHENTICATE_BEARER));
        }
        if self.clear_session {
            let removal = match request.rocket().state::<ServerState>() {
                Some(state) => state.cookies.removal(&state.cookies.name),
                None => CookieSettings {
                    name: SESSION_COOKIE_NAME.to_string(),
                    secure: true,
                }
                .removal(SESSION_COOKIE_NAME),
            };
            response.raw_header_adjoin("Set-Cookie", removal.to_string());
        }
        response.ok()
    }
}
