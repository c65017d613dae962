//! Admin status

use pws_application::{MigrationOutcome, MigrationState};
use pws_infrastructure::di::ProviderNames;
use pws_infrastructure::health::HealthCheck;
use rocket::serde::json::Json;
use rocket::{State, get};
use serde::Serialize;

use crate::guards::AdminUser;
use crate::state::ServerState;

/// `/api/admin/status` payload
#[derive(Debug, Serialize)]
pub struct AdminStatusResponse {
    /// How the startup migration step ended
    pub migration: MigrationOutcome,
    /// Final state of the migration gate
    pub migration_state: MigrationState,
    /// Store connectivity
    pub store: HealthCheck,
    /// Resolved providers
    pub providers: ProviderNames,
    /// Admin making the request
    pub requested_by: String,
}

/// Boot and dependency status, admins only
#[get("/admin/status")]
pub async fn status(admin: AdminUser, state: &State<ServerState>) -> Json<AdminStatusResponse> {
    let context = &state.context;
    Json(AdminStatusResponse {
        migration: state.migration.clone(),
        migration_state: context.migration_lock().state(),
        store: context.health().check_store().await,
        providers: context.provider_names(),
        requested_by: admin.0.id,
    })
}
