//! Access Control Guard
//!
//! Resource-level authorization for pads. A missing pad is reported as
//! `NotFound` before any permission check, so callers without access
//! cannot tell which pads exist.

use std::sync::Arc;

use pws_domain::error::{Error, Result};
use pws_domain::ports::ResourceDirectory;
use pws_domain::{Identity, ResourceAccessDescriptor};
use tracing::debug;
use uuid::Uuid;

/// Owner/shared access enforcement over the resource directory
pub struct AccessControlGuard {
    directory: Arc<dyn ResourceDirectory>,
}

impl AccessControlGuard {
    /// Create a guard over `directory`
    pub fn new(directory: Arc<dyn ResourceDirectory>) -> Self {
        Self { directory }
    }

    /// Check that `identity` may operate on `resource_id`
    ///
    /// # Arguments
    /// * `resource_id` - Pad identifier
    /// * `identity` - Authenticated caller
    /// * `require_owner` - Only the owner may proceed, even if shared
    ///
    /// # Returns
    /// The descriptor on success, `NotFound` or `Forbidden` otherwise
    pub async fn authorize(
        &self,
        resource_id: &Uuid,
        identity: &Identity,
        require_owner: bool,
    ) -> Result<ResourceAccessDescriptor> {
        let descriptor = self
            .directory
            .find_access(resource_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("pad {resource_id}")))?;

        if !descriptor.can_access(&identity.id) {
            debug!(resource = %resource_id, user = %identity.id, "Access denied");
            return Err(Error::forbidden("Not authorized to access this pad"));
        }

        if require_owner && !descriptor.is_owner(&identity.id) {
            debug!(resource = %resource_id, user = %identity.id, "Owner-only operation denied");
            return Err(Error::forbidden(
                "Only the pad owner can perform this operation",
            ));
        }

        Ok(descriptor)
    }
}

impl std::fmt::Debug for AccessControlGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessControlGuard")
            .field("directory", &self.directory.provider_name())
            .finish()
    }
}
