//! Identity Provider Port
//!
//! Contract for the external OpenID Connect provider. This core never
//! verifies credentials itself; it redirects to the provider, exchanges
//! codes and refresh tokens at the token endpoint, and validates the
//! resulting JWTs against the published key set.
//!
//! ## Error contract
//!
//! | Situation | Error |
//! |-----------|-------|
//! | Grant rejected (revoked/expired refresh token, bad code) | `Unauthenticated` |
//! | Network failure, timeout, 5xx | `UpstreamUnavailable` |
//! | Unparseable response body | `BadUpstreamResponse` |

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;

use crate::error::Result;
use crate::value_objects::{AuthorizationRequest, ProviderMetadata, TokenSet};

/// External OIDC identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Discovery metadata resolved at startup
    fn metadata(&self) -> &ProviderMetadata;

    /// OAuth client identifier (default token audience)
    fn client_id(&self) -> &str;

    /// Build the browser redirect to the authorization endpoint
    fn authorization_url(&self, request: &AuthorizationRequest) -> Result<String>;

    /// Build the RP-initiated logout URL
    ///
    /// # Returns
    ///
    /// `None` when the provider publishes no `end_session_endpoint`
    fn logout_url(
        &self,
        id_token_hint: Option<&str>,
        post_logout_redirect_uri: &str,
    ) -> Result<Option<String>>;

    /// Exchange an authorization code (`grant_type=authorization_code`)
    async fn exchange_code(&self, code: &str) -> Result<TokenSet>;

    /// Exchange a refresh token (`grant_type=refresh_token`)
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenSet>;

    /// Fetch the current signing key set from `jwks_uri`
    async fn fetch_jwks(&self) -> Result<JwkSet>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}
