//! Distributed lock record

use std::time::Duration;

/// A held lock, identified by its key and the fencing token of this holder
///
/// Release is only valid while the stored value still equals `holder_token`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockRecord {
    /// Lock key in the shared store
    pub lock_key: String,
    /// Random value written by this acquirer
    pub holder_token: String,
    /// Expiry applied at acquisition
    pub ttl: Duration,
}
