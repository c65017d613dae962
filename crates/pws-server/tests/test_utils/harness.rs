//! Application harness
//!
//! Builds an [`AppContext`] over the in-memory store and the fake identity
//! provider, and a Rocket local client over it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pws_application::MigrationOutcome;
use pws_domain::ports::WorkspaceProvisioner;
use pws_domain::{ResourceAccessDescriptor, SessionRecord};
use pws_infrastructure::config::AppConfig;
use pws_infrastructure::di::{AppContext, AppContextBuilder};
use pws_providers::InMemoryResourceDirectory;
use pws_server::{ServerState, build_rocket};
use rocket::local::asynchronous::Client;

use super::fake_idp::{AUDIENCE, FakeIdentityProvider};

pub const FRONTEND_URL: &str = "http://localhost:3000/";
pub const COOKIE_NAME: &str = "session_id";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.oidc.discovery_url =
        "https://idp.test/realms/pad/.well-known/openid-configuration".to_string();
    config.oidc.client_id = AUDIENCE.to_string();
    config.oidc.redirect_uri = "http://localhost:8000/auth/callback".to_string();
    config.store.provider = "memory".to_string();
    config.session.refresh_poll_ms = 10;
    config.session.refresh_wait_ms = 3000;
    config.server.frontend_url = FRONTEND_URL.to_string();
    config.server.secure_cookies = false;
    config.server.cookie_name = COOKIE_NAME.to_string();
    config.migration.poll_interval_ms = 10;
    config
}

pub struct TestApp {
    pub idp: Arc<FakeIdentityProvider>,
    pub directory: Arc<InMemoryResourceDirectory>,
    pub context: Arc<AppContext>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_idp(FakeIdentityProvider::new()).await
    }

    pub async fn with_idp(idp: FakeIdentityProvider) -> Self {
        Self::build(idp, None).await
    }

    pub async fn with_provisioner(provisioner: Arc<dyn WorkspaceProvisioner>) -> Self {
        Self::build(FakeIdentityProvider::new(), Some(provisioner)).await
    }

    async fn build(
        idp: FakeIdentityProvider,
        provisioner: Option<Arc<dyn WorkspaceProvisioner>>,
    ) -> Self {
        let idp = Arc::new(idp);
        let directory = Arc::new(InMemoryResourceDirectory::new());
        let mut builder = AppContextBuilder::new(test_config())
            .with_identity_provider(idp.clone())
            .with_resource_directory(directory.clone());
        if let Some(provisioner) = provisioner {
            builder = builder.with_provisioner(provisioner);
        }
        let context = builder.build().await.unwrap();
        Self {
            idp,
            directory,
            context: Arc::new(context),
        }
    }

    fn state(&self) -> ServerState {
        ServerState::new(Arc::clone(&self.context), MigrationOutcome::Migrated)
    }

    /// Client that does not keep cookies between requests
    pub async fn client(&self) -> Client {
        Client::untracked(build_rocket(self.state())).await.unwrap()
    }

    /// Client that behaves like a browser cookie jar
    pub async fn browser(&self) -> Client {
        Client::tracked(build_rocket(self.state())).await.unwrap()
    }

    /// Store a session for `sub` whose access token expires in `ttl_secs`
    pub async fn seed(&self, session_id: &str, sub: &str, ttl_secs: i64) -> SessionRecord {
        let now = Utc::now();
        let mut record =
            SessionRecord::from_token_set(session_id, self.idp.token_set(sub, ttl_secs), now);
        record.expires_at = now + chrono::Duration::seconds(ttl_secs);
        self.context
            .sessions()
            .set(session_id, &record, Duration::from_secs(1800))
            .await
            .unwrap();
        record
    }

    pub async fn session(&self, session_id: &str) -> Option<SessionRecord> {
        self.context.sessions().get(session_id).await.unwrap()
    }

    /// Register a pad owned by `owner`, shared with `shared`
    pub fn add_pad(&self, owner: &str, shared: &[&str]) -> uuid::Uuid {
        let id = uuid::Uuid::new_v4();
        let descriptor = shared
            .iter()
            .fold(ResourceAccessDescriptor::new(id, owner), |d, s| {
                d.shared_with(*s)
            });
        self.directory.insert(descriptor);
        id
    }
}
