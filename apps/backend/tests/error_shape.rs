// Every error leaves the service as `{message, code, trace_id}` with the
// trace id echoed in `x-trace-id`.

mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};
use backend_test_support::error_body::assert_error_response;
use bookstore_backend::errors::ErrorCode;
use bookstore_backend::middleware::RequestTrace;
use bookstore_backend::AppError;

async fn failing_validation() -> Result<HttpResponse, AppError> {
    Err(AppError::invalid(ErrorCode::ValidationError, "Example failure"))
}

async fn failing_database() -> Result<HttpResponse, AppError> {
    Err(AppError::db("relation \"books\" does not exist at db-7.internal"))
}

#[actix_web::test]
async fn test_client_error_shape() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/error", web::get().to(failing_validation)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/error").to_request();
    let resp = test::call_service(&app, req).await;

    let trace_header = resp
        .headers()
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-trace-id header");

    let body = assert_error_response(
        resp,
        StatusCode::BAD_REQUEST,
        "VALIDATION_ERROR",
        "Example failure",
    )
    .await;
    assert_eq!(body.trace_id, trace_header);
    assert_ne!(body.trace_id, "unknown");
}

#[actix_web::test]
async fn test_server_error_hides_detail() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/db", web::get().to(failing_database)),
    )
    .await;

    let req = test::TestRequest::get().uri("/_test/db").to_request();
    let resp = test::call_service(&app, req).await;
    let body = assert_error_response(
        resp,
        StatusCode::INTERNAL_SERVER_ERROR,
        "DB_ERROR",
        "Server error. Please try again later.",
    )
    .await;
    assert!(!body.message.contains("db-7"));
}

#[actix_web::test]
async fn test_each_request_gets_its_own_trace_id() {
    let app = test::init_service(
        App::new()
            .wrap(RequestTrace)
            .route("/_test/error", web::get().to(failing_validation)),
    )
    .await;

    let mut seen = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get().uri("/_test/error").to_request();
        let resp = test::call_service(&app, req).await;
        let body = assert_error_response(
            resp,
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Example failure",
        )
        .await;
        seen.push(body.trace_id);
    }
    assert_ne!(seen[0], seen[1]);
}
