//! Pad access checks
//!
//! Pad storage is external; these routes only answer who may touch a pad.
//! Unknown and malformed ids both answer 404, so existence does not leak.

use std::collections::BTreeSet;

use pws_domain::ResourceAccessDescriptor;
use pws_domain::error::Error;
use rocket::serde::json::Json;
use rocket::{State, get};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::guards::AuthenticatedUser;
use crate::state::ServerState;

/// Sharing list of a pad, visible to its owner
#[derive(Debug, Serialize)]
pub struct SharingResponse {
    /// Pad identifier
    pub resource_id: Uuid,
    /// Owner identity id
    pub owner_id: String,
    /// Identity ids the pad is shared with
    pub shared_with: BTreeSet<String>,
}

fn parse_pad_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| Error::not_found(format!("pad {id}")).into())
}

/// Descriptor of a pad the caller owns or has been shared
#[get("/pads/<id>/access")]
pub async fn access(
    id: &str,
    user: AuthenticatedUser,
    state: &State<ServerState>,
) -> Result<Json<ResourceAccessDescriptor>, ApiError> {
    let pad = parse_pad_id(id)?;
    let descriptor = state.context.access().authorize(&pad, &user.0, false).await?;
    Ok(Json(descriptor))
}

/// Sharing list of a pad the caller owns
#[get("/pads/<id>/sharing")]
pub async fn sharing(
    id: &str,
    user: AuthenticatedUser,
    state: &State<ServerState>,
) -> Result<Json<SharingResponse>, ApiError> {
    let pad = parse_pad_id(id)?;
    let descriptor = state.context.access().authorize(&pad, &user.0, true).await?;
    Ok(Json(SharingResponse {
        resource_id: descriptor.resource_id,
        owner_id: descriptor.owner_id,
        shared_with: descriptor.shared_with,
    }))
}
