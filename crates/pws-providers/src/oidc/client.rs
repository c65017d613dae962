//! OpenID Connect HTTP client
//!
//! Talks to the identity provider over HTTP: discovery at startup, then the
//! token endpoint (code exchange and refresh) and the JWKS endpoint. Every
//! request is bounded by the configured timeout.
//!
//! ## Failure mapping
//!
//! | Response | Error |
//! |----------|-------|
//! | connect error, timeout, 5xx | `UpstreamUnavailable` |
//! | 4xx from the token endpoint | `Unauthenticated` (grant rejected) |
//! | body that does not parse | `BadUpstreamResponse` |

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use pws_domain::error::{Error, Result};
use pws_domain::ports::IdentityProvider;
use pws_domain::value_objects::{AuthorizationRequest, ProviderMetadata, TokenSet};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::constants::{DEFAULT_OIDC_HTTP_TIMEOUT, DEFAULT_OIDC_SCOPES};

/// Client registration and endpoints of the identity provider
#[derive(Debug, Clone)]
pub struct OidcClientConfig {
    /// `.well-known/openid-configuration` URL
    pub discovery_url: String,
    /// OAuth client id
    pub client_id: String,
    /// OAuth client secret, for confidential clients
    pub client_secret: Option<String>,
    /// Callback URL registered with the provider
    pub redirect_uri: String,
    /// Scopes requested at login
    pub scopes: Vec<String>,
    /// Bound on every HTTP call
    pub timeout: Duration,
}

impl OidcClientConfig {
    /// Configuration with default scopes and timeout
    pub fn new(
        discovery_url: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            discovery_url: discovery_url.into(),
            client_id: client_id.into(),
            client_secret: None,
            redirect_uri: redirect_uri.into(),
            scopes: DEFAULT_OIDC_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            timeout: DEFAULT_OIDC_HTTP_TIMEOUT,
        }
    }

    /// Set the client secret
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into()).filter(|s: &String| !s.is_empty());
        self
    }

    /// Replace the requested scopes
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Set the HTTP timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// OAuth error body (`{"error": "...", "error_description": "..."}`)
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// HTTP implementation of [`IdentityProvider`]
pub struct OidcHttpClient {
    http: Client,
    config: OidcClientConfig,
    metadata: ProviderMetadata,
}

impl OidcHttpClient {
    /// Fetch the discovery document and build the client
    pub async fn discover(config: OidcClientConfig) -> Result<Self> {
        let http = Self::http_client(&config)?;
        let response = http
            .get(&config.discovery_url)
            .send()
            .await
            .map_err(|e| Self::transport_error("discovery", e))?;
        let response = Self::ensure_available("discovery", response)?;
        if !response.status().is_success() {
            return Err(Error::upstream_unavailable(format!(
                "OIDC discovery returned {}",
                response.status()
            )));
        }
        let metadata: ProviderMetadata = Self::parse("discovery", response).await?;

        info!(
            issuer = %metadata.issuer,
            logout = metadata.end_session_endpoint.is_some(),
            "Loaded OIDC provider metadata"
        );
        Ok(Self {
            http,
            config,
            metadata,
        })
    }

    /// Build the client from already known metadata
    pub fn with_metadata(config: OidcClientConfig, metadata: ProviderMetadata) -> Result<Self> {
        Ok(Self {
            http: Self::http_client(&config)?,
            config,
            metadata,
        })
    }

    fn http_client(config: &OidcClientConfig) -> Result<Client> {
        Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::configuration_with_source("Failed to build HTTP client", e))
    }

    fn transport_error(op: &str, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::upstream_unavailable_with_source(format!("OIDC {op} timed out"), e)
        } else {
            Error::upstream_unavailable_with_source(format!("OIDC {op} request failed: {e}"), e)
        }
    }

    /// Map 5xx to `UpstreamUnavailable`, pass everything else through
    /// 5xx, 408 and 429 are transient: the caller may retry later
    fn ensure_available(op: &str, response: Response) -> Result<Response> {
        let status = response.status();
        let transient = status.is_server_error()
            || status == StatusCode::REQUEST_TIMEOUT
            || status == StatusCode::TOO_MANY_REQUESTS;
        if transient {
            warn!(op, status = status.as_u16(), "OIDC provider temporarily unavailable");
            Err(Error::upstream_unavailable(format!(
                "OIDC {op} returned {status}"
            )))
        } else {
            Ok(response)
        }
    }

    async fn parse<T: DeserializeOwned>(op: &str, response: Response) -> Result<T> {
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::transport_error(op, e))?;
        serde_json::from_slice(&body).map_err(|e| {
            Error::bad_upstream_response(format!("OIDC {op} response did not parse: {e}"))
        })
    }

    async fn token_request(&self, grant: &str, params: &[(&str, &str)]) -> Result<TokenSet> {
        let mut form: Vec<(&str, &str)> = vec![
            ("grant_type", grant),
            ("client_id", self.config.client_id.as_str()),
        ];
        if let Some(secret) = &self.config.client_secret {
            form.push(("client_secret", secret.as_str()));
        }
        form.extend_from_slice(params);

        let response = self
            .http
            .post(&self.metadata.token_endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| Self::transport_error(grant, e))?;
        let response = Self::ensure_available(grant, response)?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<OAuthErrorBody>(&body)
                .map(|b| match b.error_description {
                    Some(desc) => format!("{}: {desc}", b.error),
                    None => b.error,
                })
                .unwrap_or_else(|_| status.to_string());
            warn!(grant, status = status.as_u16(), reason = %reason, "Token endpoint rejected grant");
            return Err(Error::unauthenticated(format!("{grant} rejected: {reason}")));
        }
        if !status.is_success() {
            return Err(Error::bad_upstream_response(format!(
                "token endpoint returned {status}"
            )));
        }

        Self::parse(grant, response).await
    }
}

#[async_trait]
impl IdentityProvider for OidcHttpClient {
    fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    fn client_id(&self) -> &str {
        &self.config.client_id
    }

    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String> {
        let mut url = Url::parse(&self.metadata.authorization_endpoint).map_err(|e| {
            Error::bad_upstream_response(format!("invalid authorization_endpoint: {e}"))
        })?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.config.client_id)
                .append_pair("redirect_uri", &self.config.redirect_uri)
                .append_pair("scope", &self.config.scopes.join(" "))
                .append_pair("state", &request.state);
            if let Some(hint) = &request.idp_hint {
                query.append_pair("kc_idp_hint", hint);
            }
        }
        Ok(url.into())
    }

    fn logout_url(
        &self,
        id_token_hint: Option<&str>,
        post_logout_redirect_uri: &str,
    ) -> Result<Option<String>> {
        let Some(endpoint) = &self.metadata.end_session_endpoint else {
            return Ok(None);
        };
        let mut url = Url::parse(endpoint).map_err(|e| {
            Error::bad_upstream_response(format!("invalid end_session_endpoint: {e}"))
        })?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(hint) = id_token_hint {
                query.append_pair("id_token_hint", hint);
            }
            query.append_pair("post_logout_redirect_uri", post_logout_redirect_uri);
            query.append_pair("client_id", &self.config.client_id);
        }
        Ok(Some(url.into()))
    }

    async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        debug!("Exchanging authorization code");
        self.token_request(
            "authorization_code",
            &[
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ],
        )
        .await
    }

    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet> {
        debug!("Refreshing access token");
        self.token_request("refresh_token", &[("refresh_token", refresh_token)])
            .await
    }

    async fn fetch_jwks(&self) -> Result<JwkSet> {
        let response = self
            .http
            .get(&self.metadata.jwks_uri)
            .send()
            .await
            .map_err(|e| Self::transport_error("jwks", e))?;
        let response = Self::ensure_available("jwks", response)?;
        if !response.status().is_success() {
            return Err(Error::upstream_unavailable(format!(
                "OIDC jwks returned {}",
                response.status()
            )));
        }
        Self::parse("jwks", response).await
    }

    fn provider_name(&self) -> &str {
        "oidc"
    }
}

impl std::fmt::Debug for OidcHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcHttpClient")
            .field("issuer", &self.metadata.issuer)
            .field("client_id", &self.config.client_id)
            .finish_non_exhaustive()
    }
}
