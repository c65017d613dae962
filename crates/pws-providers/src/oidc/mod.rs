//! OpenID Connect identity provider client

pub mod client;

pub use client::{OidcClientConfig, OidcHttpClient};
