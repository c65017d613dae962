//! Application Bootstrap - Composition Root
//!
//! Builds every service from configuration. The key-value store backend is
//! resolved by name through the linkme provider registry; the identity
//! provider is discovered over HTTP.
//!
//! ```text
//! AppConfig → registry → KeyValueStore ─┬→ SessionStore ─┐
//!                                       └→ LockProvider ─┴→ TokenLifecycleManager → AuthResolver
//!           → OIDC discovery → IdentityProvider ──────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(config).await?;
//! let identity = context.auth().required(cookie).await?;
//! ```
//!
//! Tests and embedders replace individual providers through
//! [`AppContextBuilder`] before building.

use std::sync::Arc;

use pws_application::ports::registry::{KvStoreProviderConfig, resolve_kv_store_provider};
use pws_application::{
    AccessControlGuard, AuthResolver, DistributedMigrationLock, MigrationLockSettings,
    SessionStore, TokenLifecycleManager, TokenLifecycleSettings,
};
use pws_domain::error::{Error, Result};
use pws_domain::ports::{
    IdentityProvider, KeyValueStore, LockProvider, MigrationRunner, ResourceDirectory,
    WorkspaceProvisioner,
};
use pws_providers::{
    CommandMigrationRunner, InMemoryResourceDirectory, KeyValueLockProvider, NoopMigrationRunner,
    NullWorkspaceProvisioner, OidcClientConfig, OidcHttpClient,
};
use serde::Serialize;
use tracing::info;

use crate::config::AppConfig;
use crate::health::HealthChecker;

/// Names of the resolved providers, for diagnostics
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProviderNames {
    /// Key-value store backend
    pub kv_store: String,
    /// Identity provider client
    pub identity: String,
    /// Resource directory
    pub resources: String,
    /// Workspace provisioner
    pub provisioning: String,
    /// Migration runner
    pub migration: String,
}

/// Application context holding every built service
pub struct AppContext {
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ========================================================================
    // Providers
    // ========================================================================
    kv_store: Arc<dyn KeyValueStore>,
    lock_provider: Arc<dyn LockProvider>,
    identity_provider: Arc<dyn IdentityProvider>,
    resource_directory: Arc<dyn ResourceDirectory>,
    provisioner: Arc<dyn WorkspaceProvisioner>,
    migration_runner: Arc<dyn MigrationRunner>,

    // ========================================================================
    // Services
    // ========================================================================
    sessions: Arc<SessionStore>,
    tokens: Arc<TokenLifecycleManager>,
    auth: Arc<AuthResolver>,
    access: Arc<AccessControlGuard>,
    migration_lock: Arc<DistributedMigrationLock>,
    health: Arc<HealthChecker>,
}

impl AppContext {
    // ========================================================================
    // Providers
    // ========================================================================

    /// Shared key-value store
    pub fn kv_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.kv_store)
    }

    /// Distributed lock provider
    pub fn lock_provider(&self) -> Arc<dyn LockProvider> {
        Arc::clone(&self.lock_provider)
    }

    /// Identity provider client
    pub fn identity_provider(&self) -> Arc<dyn IdentityProvider> {
        Arc::clone(&self.identity_provider)
    }

    /// Pad ownership directory
    pub fn resource_directory(&self) -> Arc<dyn ResourceDirectory> {
        Arc::clone(&self.resource_directory)
    }

    /// Workspace provisioning service
    pub fn provisioner(&self) -> Arc<dyn WorkspaceProvisioner> {
        Arc::clone(&self.provisioner)
    }

    /// Startup migration runner
    pub fn migration_runner(&self) -> Arc<dyn MigrationRunner> {
        Arc::clone(&self.migration_runner)
    }

    // ========================================================================
    // Services
    // ========================================================================

    /// Session persistence
    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.sessions)
    }

    /// Token verification and refresh
    pub fn tokens(&self) -> Arc<TokenLifecycleManager> {
        Arc::clone(&self.tokens)
    }

    /// Access tier resolution
    pub fn auth(&self) -> Arc<AuthResolver> {
        Arc::clone(&self.auth)
    }

    /// Pad authorization
    pub fn access(&self) -> Arc<AccessControlGuard> {
        Arc::clone(&self.access)
    }

    /// Startup migration gate
    pub fn migration_lock(&self) -> Arc<DistributedMigrationLock> {
        Arc::clone(&self.migration_lock)
    }

    /// Health checks
    pub fn health(&self) -> Arc<HealthChecker> {
        Arc::clone(&self.health)
    }

    /// Names of the resolved providers
    pub fn provider_names(&self) -> ProviderNames {
        ProviderNames {
            kv_store: self.kv_store.provider_name().to_string(),
            identity: self.identity_provider.provider_name().to_string(),
            resources: self.resource_directory.provider_name().to_string(),
            provisioning: self.provisioner.provider_name().to_string(),
            migration: self.migration_runner.name().to_string(),
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("providers", &self.provider_names())
            .finish_non_exhaustive()
    }
}

/// Builder for [`AppContext`] with optional provider overrides
pub struct AppContextBuilder {
    config: AppConfig,
    kv_store: Option<Arc<dyn KeyValueStore>>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
    resource_directory: Option<Arc<dyn ResourceDirectory>>,
    provisioner: Option<Arc<dyn WorkspaceProvisioner>>,
    migration_runner: Option<Arc<dyn MigrationRunner>>,
}

impl AppContextBuilder {
    /// Start from configuration only
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            kv_store: None,
            identity_provider: None,
            resource_directory: None,
            provisioner: None,
            migration_runner: None,
        }
    }

    /// Use this store instead of resolving `store.provider`
    #[must_use]
    pub fn with_kv_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.kv_store = Some(store);
        self
    }

    /// Use this identity provider instead of OIDC discovery
    #[must_use]
    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    /// Use this resource directory
    #[must_use]
    pub fn with_resource_directory(mut self, directory: Arc<dyn ResourceDirectory>) -> Self {
        self.resource_directory = Some(directory);
        self
    }

    /// Use this workspace provisioner
    #[must_use]
    pub fn with_provisioner(mut self, provisioner: Arc<dyn WorkspaceProvisioner>) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    /// Use this migration runner
    #[must_use]
    pub fn with_migration_runner(mut self, runner: Arc<dyn MigrationRunner>) -> Self {
        self.migration_runner = Some(runner);
        self
    }

    /// Build every service
    pub async fn build(self) -> Result<AppContext> {
        let config = self.config;

        // ====================================================================
        // Providers
        // ====================================================================
        let kv_store = match self.kv_store {
            Some(store) => store,
            None => resolve_store(&config)?,
        };
        info!(provider = kv_store.provider_name(), "Key-value store resolved");

        let identity_provider = match self.identity_provider {
            Some(provider) => provider,
            None => discover_identity_provider(&config).await?,
        };

        let resource_directory = self
            .resource_directory
            .unwrap_or_else(|| Arc::new(InMemoryResourceDirectory::new()));
        let provisioner = self
            .provisioner
            .unwrap_or_else(|| Arc::new(NullWorkspaceProvisioner::new()));
        let migration_runner = match self.migration_runner {
            Some(runner) => runner,
            None => select_migration_runner(&config)?,
        };

        let lock_provider: Arc<dyn LockProvider> =
            Arc::new(KeyValueLockProvider::new(Arc::clone(&kv_store)));

        // ====================================================================
        // Services
        // ====================================================================
        let sessions = Arc::new(SessionStore::new(Arc::clone(&kv_store)));
        let tokens = Arc::new(TokenLifecycleManager::new(
            Arc::clone(&identity_provider),
            Arc::clone(&sessions),
            Arc::clone(&lock_provider),
            token_settings(&config),
        ));
        let auth = Arc::new(AuthResolver::new(
            Arc::clone(&sessions),
            Arc::clone(&tokens),
        ));
        let access = Arc::new(AccessControlGuard::new(Arc::clone(&resource_directory)));
        let migration_lock = Arc::new(DistributedMigrationLock::new(
            Arc::clone(&lock_provider),
            MigrationLockSettings {
                lock_key: config.migration.lock_key.clone(),
                lock_ttl: config.migration.lock_ttl(),
                max_wait: config.migration.max_wait(),
                poll_interval: config.migration.poll_interval(),
            },
        ));
        let health = Arc::new(HealthChecker::new(Arc::clone(&kv_store)));

        let context = AppContext {
            config: Arc::new(config),
            kv_store,
            lock_provider,
            identity_provider,
            resource_directory,
            provisioner,
            migration_runner,
            sessions,
            tokens,
            auth,
            access,
            migration_lock,
            health,
        };
        info!(providers = ?context.provider_names(), "Application context ready");
        Ok(context)
    }
}

/// Build the application context from configuration
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    AppContextBuilder::new(config).build().await
}

fn resolve_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>> {
    let mut store_config = KvStoreProviderConfig::new(&config.store.provider)
        .with_namespace(&config.store.namespace)
        .with_operation_timeout(config.store.operation_timeout());
    if !config.store.url.is_empty() {
        store_config = store_config.with_uri(&config.store.url);
    }
    resolve_kv_store_provider(&store_config).map_err(Error::configuration)
}

async fn discover_identity_provider(config: &AppConfig) -> Result<Arc<dyn IdentityProvider>> {
    let oidc = &config.oidc;
    let mut client_config =
        OidcClientConfig::new(&oidc.discovery_url, &oidc.client_id, &oidc.redirect_uri)
            .with_scopes(oidc.scopes.clone())
            .with_timeout(oidc.http_timeout());
    if let Some(secret) = &oidc.client_secret {
        client_config = client_config.with_client_secret(secret);
    }
    Ok(Arc::new(OidcHttpClient::discover(client_config).await?))
}

fn select_migration_runner(config: &AppConfig) -> Result<Arc<dyn MigrationRunner>> {
    match &config.migration.command {
        Some(argv) => Ok(Arc::new(
            CommandMigrationRunner::new(argv)?.with_timeout(config.migration.timeout()),
        )),
        None => Ok(Arc::new(NoopMigrationRunner)),
    }
}

/// Token lifecycle settings derived from configuration
pub fn token_settings(config: &AppConfig) -> TokenLifecycleSettings {
    let mut settings = TokenLifecycleSettings::new(config.oidc.audience());
    settings.expiry_margin = config.session.expiry_margin();
    settings.refresh_lock_ttl = config.session.refresh_lock_ttl();
    settings.refresh_wait = config.session.refresh_wait();
    settings.refresh_poll = config.session.refresh_poll();
    settings.leeway_secs = config.oidc.jwks_leeway_secs;
    settings.default_expires_in_secs = config.session.default_expires_in_secs;
    settings
}
