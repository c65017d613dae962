//! Migration runners

use std::time::Duration;

use pws_domain::Error;
use pws_domain::ports::MigrationRunner;
use pws_providers::migration::{CommandMigrationRunner, NoopMigrationRunner};

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

#[tokio::test]
async fn test_noop_runner_succeeds() {
    let runner = NoopMigrationRunner;
    runner.run_migrations().await.unwrap();
    assert_eq!(runner.name(), "noop");
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_success() {
    let runner = CommandMigrationRunner::new(&argv(&["sh", "-c", "exit 0"])).unwrap();
    runner.run_migrations().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_failure_reports_stderr() {
    let runner =
        CommandMigrationRunner::new(&argv(&["sh", "-c", "echo 'relation exists' >&2; exit 3"]))
            .unwrap();

    let err = runner.run_migrations().await.unwrap_err();
    assert!(matches!(err, Error::Infrastructure { .. }));
    assert!(err.to_string().contains("relation exists"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_command_timeout() {
    let runner = CommandMigrationRunner::new(&argv(&["sh", "-c", "sleep 5"]))
        .unwrap()
        .with_timeout(Duration::from_millis(100));

    let err = runner.run_migrations().await.unwrap_err();
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_missing_program() {
    let runner = CommandMigrationRunner::new(&argv(&["pws-no-such-migration-tool"])).unwrap();
    let err = runner.run_migrations().await.unwrap_err();
    assert!(matches!(err, Error::Infrastructure { .. }));
}
