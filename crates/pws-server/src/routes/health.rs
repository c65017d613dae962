//! Health endpoint

use pws_infrastructure::health::HealthResponse;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{State, get};

use crate::state::ServerState;

/// Store connectivity; 503 when down
#[get("/health")]
pub async fn health(state: &State<ServerState>) -> (Status, Json<HealthResponse>) {
    let report = state.context.health().check().await;
    let status = if report.status.is_healthy() {
        Status::Ok
    } else {
        Status::ServiceUnavailable
    };
    (status, Json(report))
}
