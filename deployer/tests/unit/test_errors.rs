//! Error classification unit tests

use reqwest::StatusCode;
use sling_deploy::deploy::response::{unexpected_status, ResponseExpectation};
use sling_deploy::errors::{excerpt, DeployError, ErrorKind, BODY_EXCERPT_LIMIT};
use url::Url;

fn url() -> Url {
    Url::parse("http://localhost:8080/system/console/install").unwrap()
}

#[test]
fn test_unexpected_status_message() {
    let err = unexpected_status(&url(), StatusCode::NOT_FOUND);
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(
        err.to_string(),
        "Unexpected response code 404 from http://localhost:8080/system/console/install: Not Found"
    );
}

#[test]
fn test_long_bodies_are_cut() {
    let body = "ä".repeat(BODY_EXCERPT_LIMIT);
    let cut = excerpt(&body);
    assert!(cut.len() <= BODY_EXCERPT_LIMIT);
    assert!(body.starts_with(cut));

    let err = DeployError::unexpected_content(&url(), "Must be empty but was", &body);
    assert!(err.to_string().len() < body.len());
}

#[test]
fn test_recovery_errors_keep_their_cause() {
    let err = DeployError::IntermediatePathCreation {
        url: Url::parse("http://localhost:8080/apps/slingshot").unwrap(),
        source: Box::new(unexpected_status(&url(), StatusCode::METHOD_NOT_ALLOWED)),
    };
    assert_eq!(err.kind(), ErrorKind::Recovery);
    assert_eq!(err.status(), None);
    assert!(err.to_string().contains("405"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_expectation_checks_content_type() {
    let expectation = ResponseExpectation::status([StatusCode::OK]).with_content_type("application/json");

    assert!(expectation
        .check(&url(), StatusCode::OK, Some("application/json; charset=utf-8"), "{}")
        .is_ok());

    let err = expectation
        .check(&url(), StatusCode::OK, Some("text/html"), "<html/>")
        .unwrap_err();
    assert!(matches!(err, DeployError::UnexpectedContentType { .. }));

    let err = expectation.check(&url(), StatusCode::OK, None, "{}").unwrap_err();
    assert!(err.to_string().contains("<none>"));
}
