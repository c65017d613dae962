//! Resource directory implementations
//!
//! Pad ownership is owned by the storage collaborator. The in-memory
//! directory serves development setups and tests.

pub mod memory;

pub use memory::InMemoryResourceDirectory;
