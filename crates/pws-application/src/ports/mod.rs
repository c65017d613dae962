//! Application ports

/// Provider registries
pub mod registry;
