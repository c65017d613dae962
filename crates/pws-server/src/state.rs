//! Managed server state

use std::sync::Arc;

use pws_application::MigrationOutcome;
use pws_infrastructure::config::ServerConfig;
use pws_infrastructure::di::AppContext;

use crate::cookies::CookieSettings;

/// State shared by every route, managed by Rocket
#[derive(Debug, Clone)]
pub struct ServerState {
    /// Built services
    pub context: Arc<AppContext>,
    /// Session cookie attributes
    pub cookies: CookieSettings,
    /// Browser application, target of login and logout redirects
    pub frontend_url: String,
    /// How the startup migration step ended
    pub migration: MigrationOutcome,
}

impl ServerState {
    /// State for a context and the boot migration outcome
    pub fn new(context: Arc<AppContext>, migration: MigrationOutcome) -> Self {
        let server: &ServerConfig = &context.config.server;
        Self {
            cookies: CookieSettings::from_config(server),
            frontend_url: server.frontend_url.clone(),
            migration,
            context,
        }
    }
}
