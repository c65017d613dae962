//! Error handling types
//!
//! The taxonomy mirrors how failures are surfaced at the request boundary:
//! authentication failures map to 401, authorization to 403, missing
//! resources to 404 and unreachable collaborators to 502/503. Everything a
//! component can recover from locally (an expired but refreshable token)
//! never leaves the component as an error.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the pad workspace session core
#[derive(Error, Debug)]
pub enum Error {
    /// No session, an unknown session, or a session that could not be refreshed
    #[error("Unauthenticated: {message}")]
    Unauthenticated {
        /// Description of why the caller is not authenticated
        message: String,
    },

    /// Valid identity with insufficient rights
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Description of the denied operation
        message: String,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Token signature, audience or issuer did not verify
    #[error("Invalid token: {message}")]
    InvalidToken {
        /// Description of the verification failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Token verified but is past its expiry (recoverable through refresh)
    #[error("Token expired")]
    TokenExpired,

    /// Identity provider or key-value store unreachable or timed out
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable {
        /// Description of the failing upstream call
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Upstream answered, but with something that could not be understood
    #[error("Bad upstream response: {message}")]
    BadUpstreamResponse {
        /// Description of the malformed response
        message: String,
    },

    /// Distributed lock not acquired within the allowed time
    #[error("Lock timeout on '{key}' after {waited:?}")]
    LockTimeout {
        /// Lock key that stayed held
        key: String,
        /// How long the caller waited
        waited: Duration,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Authentication and authorization error creation methods
impl Error {
    /// Create an unauthenticated error
    pub fn unauthenticated<S: Into<String>>(message: S) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an invalid token error
    pub fn invalid_token<S: Into<String>>(message: S) -> Self {
        Self::InvalidToken {
            message: message.into(),
            source: None,
        }
    }

    /// Create an invalid token error with source
    pub fn invalid_token_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::InvalidToken {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

// Upstream error creation methods
impl Error {
    /// Create an upstream unavailable error
    pub fn upstream_unavailable<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Create an upstream unavailable error with source
    pub fn upstream_unavailable_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a bad upstream response error
    pub fn bad_upstream_response<S: Into<String>>(message: S) -> Self {
        Self::BadUpstreamResponse {
            message: message.into(),
        }
    }

    /// Create a lock timeout error
    pub fn lock_timeout<S: Into<String>>(key: S, waited: Duration) -> Self {
        Self::LockTimeout {
            key: key.into(),
            waited,
        }
    }
}

// Configuration and infrastructure error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

// Classification
impl Error {
    /// Transient failures the caller may retry later
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable { .. } | Self::LockTimeout { .. }
        )
    }

    /// Failures that require the user to authenticate again
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated { .. } | Self::InvalidToken { .. } | Self::TokenExpired
        )
    }

    /// Short, stable identifier of the error kind, safe to show to clients
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated { .. } => "unauthenticated",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::InvalidToken { .. } => "invalid_token",
            Self::TokenExpired => "token_expired",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::BadUpstreamResponse { .. } => "bad_upstream_response",
            Self::LockTimeout { .. } => "lock_timeout",
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Json { .. } => "json",
            Self::Configuration { .. } => "configuration",
            Self::Infrastructure { .. } => "infrastructure",
            Self::Internal { .. } => "internal",
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::internal(s)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::internal(s)
    }
}
