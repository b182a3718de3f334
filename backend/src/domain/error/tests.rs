//! Tests for the domain error payload.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;
use uuid::Uuid;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn upstream_error() -> Error {
    Error::upstream("document builder failed")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "status": 502, "body": "bad gateway" }))
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no token"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("bad token"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("taken"), ErrorCode::Conflict)]
#[case(Error::upstream("builder down"), ErrorCode::UpstreamError)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let error = Error::internal("");
    assert_eq!(error.message(), "unspecified error");
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id = TraceId::from_uuid(Uuid::nil());
    let error = TraceId::scope(trace_id, async { Error::not_found("gone") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_payload(upstream_error: Error) {
    let value = serde_json::to_value(&upstream_error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "upstream_error",
            "message": "document builder failed",
            "traceId": TRACE_ID,
            "details": { "status": 502, "body": "bad gateway" },
        })
    );
}

#[rstest]
fn deserialises_snake_case_trace_alias() {
    let error: Error = serde_json::from_value(json!({
        "code": "conflict",
        "message": "email already registered",
        "trace_id": "abc",
    }))
    .expect("deserialise error");
    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(error.trace_id(), Some("abc"));
}

#[rstest]
#[case(json!({ "code": "not_found", "message": "  " }))]
#[case(json!({ "code": "not_found", "message": "gone", "traceId": " " }))]
fn deserialisation_rejects_blank_fields(#[case] payload: serde_json::Value) {
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}
