//! Resource Directory Port
//!
//! Read-only access to pad ownership data owned by the external storage
//! collaborator. Only the fields needed for authorization are exposed.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::value_objects::ResourceAccessDescriptor;

/// Lookup of pad ownership and sharing
#[async_trait]
pub trait ResourceDirectory: Send + Sync {
    /// Fetch the access descriptor of a pad, `None` when it does not exist
    async fn find_access(&self, resource_id: &Uuid) -> Result<Option<ResourceAccessDescriptor>>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}
