//! Workspace provisioning implementations

pub mod null;

pub use null::NullWorkspaceProvisioner;
