//! Workspace Provisioning Port
//!
//! The provisioning service creates each user's remote workspace. After a
//! successful login this core only asks it to make sure the user and the
//! workspace exist; everything else about workspaces is external.

use async_trait::async_trait;

use crate::error::Result;
use crate::value_objects::Identity;

/// External workspace provisioning service
#[async_trait]
pub trait WorkspaceProvisioner: Send + Sync {
    /// Create the user in the provisioning service if missing
    async fn ensure_user(&self, identity: &Identity) -> Result<()>;

    /// Create and start the user's workspace if missing
    async fn ensure_workspace(&self, identity: &Identity) -> Result<()>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}
