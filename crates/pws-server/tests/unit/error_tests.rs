//! Boundary error rendering

use pws_domain::error::Error;
use pws_server::ApiError;
use rocket::http::Status;

#[test]
fn test_from_status_kinds() {
    assert_eq!(ApiError::from_status(Status::NotFound).kind(), "not_found");
    assert_eq!(ApiError::from_status(Status::Forbidden).kind(), "forbidden");
    assert_eq!(
        ApiError::from_status(Status::UnprocessableEntity).kind(),
        "invalid_argument"
    );
    assert_eq!(
        ApiError::from_status(Status::ImATeapot).kind(),
        "internal"
    );
}

#[test]
fn test_only_unauthorized_clears_session() {
    assert!(ApiError::from_status(Status::Unauthorized).clears_session());
    assert!(!ApiError::from_status(Status::Forbidden).clears_session());
    assert!(!ApiError::from(Error::forbidden("owner only")).clears_session());
}

#[test]
fn test_body_carries_kind_and_message() {
    let api = ApiError::unauthorized("No session found");
    let body = api.body();

    assert_eq!(body.error, "unauthenticated");
    assert_eq!(body.message, "No session found");
}

#[test]
fn test_with_message_replaces_generic_text() {
    let api = ApiError::from(Error::not_found("pad 42")).with_message("Pad not found");

    assert_eq!(api.status(), Status::NotFound);
    assert_eq!(api.message(), "Pad not found");
}

#[test]
fn test_domain_detail_stays_out_of_message() {
    let api = ApiError::from(Error::forbidden("user bob is not owner of pad 7"));

    assert_eq!(api.status(), Status::Forbidden);
    assert!(!api.message().contains("bob"));
}

#[test]
fn test_bad_upstream_response_is_bad_gateway() {
    let api = ApiError::from(Error::bad_upstream_response("token endpoint sent HTML"));

    assert_eq!(api.status(), Status::BadGateway);
    assert_eq!(api.kind(), "bad_upstream_response");
}
