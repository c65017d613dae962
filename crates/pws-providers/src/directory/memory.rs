//! In-memory resource directory

use async_trait::async_trait;
use dashmap::DashMap;
use pws_domain::ResourceAccessDescriptor;
use pws_domain::error::Result;
use pws_domain::ports::ResourceDirectory;
use uuid::Uuid;

/// DashMap-backed pad ownership table
#[derive(Debug, Default)]
pub struct InMemoryResourceDirectory {
    entries: DashMap<Uuid, ResourceAccessDescriptor>,
}

impl InMemoryResourceDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a descriptor
    pub fn insert(&self, descriptor: ResourceAccessDescriptor) {
        self.entries.insert(descriptor.resource_id, descriptor);
    }

    /// Remove a descriptor, returning it if present
    pub fn remove(&self, resource_id: &Uuid) -> Option<ResourceAccessDescriptor> {
        self.entries.remove(resource_id).map(|(_, d)| d)
    }

    /// Number of known pads
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ResourceDirectory for InMemoryResourceDirectory {
    async fn find_access(&self, resource_id: &Uuid) -> Result<Option<ResourceAccessDescriptor>> {
        Ok(self.entries.get(resource_id).map(|d| d.value().clone()))
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}
