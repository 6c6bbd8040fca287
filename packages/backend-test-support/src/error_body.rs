//! Assertions on the backend's JSON error contract.
//!
//! Kept independent of backend types so the contract is checked from the
//! outside, the way a client sees it.

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Client-visible shape of an error response.
#[derive(Debug, Deserialize)]
pub struct ErrorBodyLike {
    pub message: String,
    pub code: String,
    pub trace_id: String,
}

/// Validate status, content type, trace-id parity and `message`/`code`,
/// returning the parsed body for further checks.
pub fn assert_error_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_status: StatusCode,
    expected_code: &str,
    expected_message: &str,
) -> ErrorBodyLike {
    assert_eq!(status, expected_status);

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/json"),
        "error responses must be JSON (got {content_type})"
    );

    let parsed: ErrorBodyLike =
        serde_json::from_slice(body).expect("error body should be valid JSON");

    if let Some(header_trace_id) = headers.get("x-trace-id").and_then(|v| v.to_str().ok()) {
        assert_eq!(
            parsed.trace_id, header_trace_id,
            "trace_id in body should match x-trace-id header"
        );
    }

    if status == StatusCode::UNAUTHORIZED {
        let www_auth = headers
            .get("www-authenticate")
            .and_then(|v| v.to_str().ok());
        assert_eq!(www_auth, Some("Bearer"), "401 responses must challenge with Bearer");
    }

    assert_eq!(parsed.code, expected_code);
    assert_eq!(parsed.message, expected_message);
    parsed
}

/// [`assert_error_parts`] for an actix test `ServiceResponse`.
pub async fn assert_error_response(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
    expected_message: &str,
) -> ErrorBodyLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;
    assert_error_parts(
        status,
        &headers,
        &body,
        expected_status,
        expected_code,
        expected_message,
    )
}
