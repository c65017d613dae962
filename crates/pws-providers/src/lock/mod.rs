//! Distributed lock implementations

pub mod kv;

pub use kv::KeyValueLockProvider;
