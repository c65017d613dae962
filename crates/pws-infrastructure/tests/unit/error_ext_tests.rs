//! Error Extension Tests

use std::error::Error as _;
use std::io;

use pws_domain::error::{Error, Result};
use pws_infrastructure::error_ext::ErrorContext;

fn io_failure() -> std::result::Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "file not found"))
}

#[test]
fn test_context_is_infrastructure() {
    let result: Result<()> = io_failure().context("failed to read file");
    match result {
        Err(Error::Infrastructure { message, source }) => {
            assert!(message.contains("failed to read file"));
            assert!(message.contains("file not found"));
            assert!(source.is_some());
        }
        other => panic!("Expected Infrastructure error, got {other:?}"),
    }
}

#[test]
fn test_with_context_is_lazy_infrastructure() {
    let ok: Result<u8> = Ok::<u8, io::Error>(7).with_context(|| -> String {
        panic!("context must not be built on success")
    });
    assert_eq!(ok.unwrap(), 7);

    let err = io_failure().with_context(|| format!("pad {}", 42)).unwrap_err();
    assert_eq!(err.kind(), "infrastructure");
    assert!(err.to_string().contains("pad 42"));
}

#[test]
fn test_config_context_is_configuration() {
    let err = io_failure().config_context("bad config").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.source().is_some());
}
