//! Null Workspace Provisioner
//!
//! Used when no provisioning service is configured. Every call succeeds
//! and is only logged.

use async_trait::async_trait;
use pws_domain::Identity;
use pws_domain::error::Result;
use pws_domain::ports::WorkspaceProvisioner;
use tracing::debug;

/// Provisioner that does nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct NullWorkspaceProvisioner;

impl NullWorkspaceProvisioner {
    /// Create the provisioner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkspaceProvisioner for NullWorkspaceProvisioner {
    async fn ensure_user(&self, identity: &Identity) -> Result<()> {
        debug!(user = %identity.id, "Skipping user provisioning");
        Ok(())
    }

    async fn ensure_workspace(&self, identity: &Identity) -> Result<()> {
        debug!(user = %identity.id, "Skipping workspace provisioning");
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}
