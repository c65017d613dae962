//! Migration runner implementations
//!
//! | Runner | Description |
//! |--------|-------------|
//! | [`CommandMigrationRunner`] | Runs an external schema tool |
//! | [`NoopMigrationRunner`] | Nothing to migrate |

pub mod command;
pub mod noop;

pub use command::CommandMigrationRunner;
pub use noop::NoopMigrationRunner;
