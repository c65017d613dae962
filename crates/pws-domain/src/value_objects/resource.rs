//! Resource ownership projection

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal projection of a pad used for authorization decisions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceAccessDescriptor {
    /// Pad identifier
    pub resource_id: Uuid,
    /// Identity id of the owner
    pub owner_id: String,
    /// Identity ids the pad is shared with
    #[serde(default)]
    pub shared_with: BTreeSet<String>,
}

impl ResourceAccessDescriptor {
    /// Create a descriptor with no sharing
    pub fn new(resource_id: Uuid, owner_id: impl Into<String>) -> Self {
        Self {
            resource_id,
            owner_id: owner_id.into(),
            shared_with: BTreeSet::new(),
        }
    }

    /// Add an identity to the sharing list
    #[must_use]
    pub fn shared_with(mut self, identity_id: impl Into<String>) -> Self {
        self.shared_with.insert(identity_id.into());
        self
    }

    /// Whether `identity_id` owns the resource
    pub fn is_owner(&self, identity_id: &str) -> bool {
        self.owner_id == identity_id
    }

    /// Whether `identity_id` is the owner or in the sharing list
    pub fn can_access(&self, identity_id: &str) -> bool {
        self.is_owner(identity_id) || self.shared_with.contains(identity_id)
    }
}
