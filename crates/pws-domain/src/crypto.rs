//! Secure random token generation
//!
//! Session identifiers, lock fencing tokens and OAuth state nonces all come
//! from the thread-local CSPRNG and are rendered as URL-safe base64 without
//! padding so they can travel in cookies, query strings and store keys.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;

use crate::constants::{FENCING_TOKEN_BYTES, SESSION_ID_BYTES};

/// Secure token generator
pub struct TokenGenerator;

impl TokenGenerator {
    /// Generate a URL-safe token from `bytes` random bytes
    pub fn generate_url_safe_token(bytes: usize) -> String {
        let mut buf = vec![0u8; bytes];
        rand::rng().fill_bytes(&mut buf);
        URL_SAFE_NO_PAD.encode(buf)
    }

    /// Generate a new opaque session identifier
    pub fn session_id() -> String {
        Self::generate_url_safe_token(SESSION_ID_BYTES)
    }

    /// Generate a fencing token for a lock acquisition
    pub fn fencing_token() -> String {
        Self::generate_url_safe_token(FENCING_TOKEN_BYTES)
    }

    /// Generate a nonce for the OAuth `state` parameter
    pub fn state_nonce() -> String {
        Self::generate_url_safe_token(FENCING_TOKEN_BYTES)
    }
}
