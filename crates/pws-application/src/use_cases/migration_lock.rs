//! Distributed Migration Lock
//!
//! Makes sure at most one process runs the startup migration. The state
//! machine per process is:
//!
//! ```text
//! Idle → Acquiring → Holder  → Done   (ran the migration)
//!                  ↘ Waiting → Done   (someone else ran it, or gave up waiting)
//! ```
//!
//! The holder extends the lock every third of its TTL while the runner is
//! active, so a migration that outlasts the TTL keeps others waiting.
//!
//! Nothing here stops the process from serving traffic: a lock that stays
//! held past `max_wait` yields a degraded-mode warning, and store or runner
//! failures are logged and reported through the returned outcome.

use std::sync::Arc;
use std::time::Duration;

use pws_domain::LockRecord;
use pws_domain::constants::MIGRATION_LOCK_KEY;
use pws_domain::error::{Error, Result};
use pws_domain::ports::{LockProvider, MigrationRunner};
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, interval, sleep};
use tracing::{debug, error, info, warn};

/// Where a process is in the migration handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    /// Not started
    Idle,
    /// Trying to take the lock
    Acquiring,
    /// Holding the lock and running migrations
    Holder,
    /// Another process holds the lock
    Waiting,
    /// Finished, whatever the outcome
    Done,
}

/// How the migration step ended for this process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MigrationOutcome {
    /// This process ran the migration successfully
    Migrated,
    /// Another process ran it; the lock was released while waiting
    AlreadyMigrated,
    /// The lock was still held after `max_wait`; serving anyway
    Degraded,
    /// Migrations are disabled in configuration
    Skipped,
    /// Store or runner error; serving anyway
    Failed {
        /// Error description
        message: String,
    },
}

/// Timing and key of the migration lock
#[derive(Debug, Clone)]
pub struct MigrationLockSettings {
    /// Lock key in the shared store
    pub lock_key: String,
    /// Lock expiry, bounds how long a crashed holder blocks others;
    /// a live holder extends it while migrating
    pub lock_ttl: Duration,
    /// Longest time to wait for another holder
    pub max_wait: Duration,
    /// Interval between checks while waiting
    pub poll_interval: Duration,
}

impl Default for MigrationLockSettings {
    fn default() -> Self {
        Self {
            lock_key: MIGRATION_LOCK_KEY.to_string(),
            lock_ttl: Duration::from_secs(120),
            max_wait: Duration::from_secs(300),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// At-most-one-runner gate for the startup migration
pub struct DistributedMigrationLock {
    locks: Arc<dyn LockProvider>,
    settings: MigrationLockSettings,
    state: watch::Sender<MigrationState>,
}

impl DistributedMigrationLock {
    /// Create the gate in the `Idle` state
    pub fn new(locks: Arc<dyn LockProvider>, settings: MigrationLockSettings) -> Self {
        let (state, _) = watch::channel(MigrationState::Idle);
        Self {
            locks,
            settings,
            state,
        }
    }

    /// Current state
    pub fn state(&self) -> MigrationState {
        *self.state.borrow()
    }

    /// Observe state transitions
    pub fn subscribe(&self) -> watch::Receiver<MigrationState> {
        self.state.subscribe()
    }

    fn transition(&self, next: MigrationState) {
        let previous = self.state.send_replace(next);
        debug!(lock_key = %self.settings.lock_key, from = ?previous, to = ?next, "Migration state");
    }

    fn finish(&self, outcome: MigrationOutcome) -> MigrationOutcome {
        self.transition(MigrationState::Done);
        outcome
    }

    /// Run the migration at most once across all processes sharing the store
    pub async fn run(&self, runner: &dyn MigrationRunner) -> MigrationOutcome {
        self.transition(MigrationState::Acquiring);
        let key = self.settings.lock_key.as_str();

        let acquired = match self.locks.try_acquire(key, self.settings.lock_ttl).await {
            Ok(acquired) => acquired,
            Err(e) => {
                error!(lock_key = %key, error = %e, "Could not acquire migration lock, starting without migrating");
                return self.finish(MigrationOutcome::Failed {
                    message: e.to_string(),
                });
            }
        };

        let Some(lock) = acquired else {
            self.transition(MigrationState::Waiting);
            info!(lock_key = %key, "Another process is migrating, waiting");
            let outcome = self.wait_for_holder().await;
            return self.finish(outcome);
        };

        self.transition(MigrationState::Holder);
        info!(lock_key = %key, runner = runner.name(), "Running migrations");
        let started = Instant::now();
        let result = self.run_with_renewal(runner, &lock).await;

        match self.locks.release(&lock).await {
            Ok(true) => {}
            Ok(false) => warn!(lock_key = %key, "Migration lock expired before release"),
            Err(e) => warn!(lock_key = %key, error = %e, "Failed to release migration lock"),
        }

        let outcome = match result {
            Ok(()) => {
                info!(
                    lock_key = %key,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Migrations completed"
                );
                MigrationOutcome::Migrated
            }
            Err(e) => {
                error!(lock_key = %key, error = %e, "Migrations failed, starting anyway");
                MigrationOutcome::Failed {
                    message: e.to_string(),
                }
            }
        };
        self.finish(outcome)
    }

    /// Run migrations while extending `lock` in the background
    async fn run_with_renewal(
        &self,
        runner: &dyn MigrationRunner,
        lock: &LockRecord,
    ) -> Result<()> {
        let key = lock.lock_key.as_str();
        let period = (self.settings.lock_ttl / 3).max(Duration::from_millis(1));
        let mut renewal = interval(period);
        renewal.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        renewal.tick().await;

        let migration = runner.run_migrations();
        tokio::pin!(migration);

        loop {
            tokio::select! {
                result = &mut migration => return result,
                _ = renewal.tick() => match self.locks.extend(lock).await {
                    Ok(true) => debug!(lock_key = %key, "Migration lock extended"),
                    Ok(false) => warn!(lock_key = %key, "Migration lock lost while migrating"),
                    Err(e) => warn!(lock_key = %key, error = %e, "Failed to extend migration lock"),
                },
            }
        }
    }

    async fn wait_for_holder(&self) -> MigrationOutcome {
        let key = self.settings.lock_key.as_str();
        let started = Instant::now();

        loop {
            sleep(self.settings.poll_interval).await;

            match self.locks.is_held(key).await {
                Ok(false) => {
                    info!(lock_key = %key, "Lock released, already migrated");
                    return MigrationOutcome::AlreadyMigrated;
                }
                Ok(true) => {}
                Err(e) => {
                    error!(lock_key = %key, error = %e, "Lost track of migration lock, starting anyway");
                    return MigrationOutcome::Failed {
                        message: e.to_string(),
                    };
                }
            }

            let waited = started.elapsed();
            if waited >= self.settings.max_wait {
                let timeout = Error::lock_timeout(key, waited);
                warn!(
                    lock_key = %key,
                    error = %timeout,
                    "Migration lock still held, serving in degraded mode"
                );
                return MigrationOutcome::Degraded;
            }
        }
    }
}

impl std::fmt::Debug for DistributedMigrationLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DistributedMigrationLock")
            .field("settings", &self.settings)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
