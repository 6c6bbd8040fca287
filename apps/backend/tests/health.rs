mod common;
mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use async_trait::async_trait;
use bookstore_backend::errors::domain::DomainError;
use bookstore_backend::infra::state::StateBuilder;
use bookstore_backend::repos::users::{CredentialRecord, CredentialStore, NewCredential};
use serde_json::Value;
use support::auth::test_security;
use support::media::FakeMediaHost;
use support::{build_test_state, create_test_app};

#[actix_web::test]
async fn test_root_greeting() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(FakeMediaHost::default())).await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-trace-id"));

    let body = test::read_body(resp).await;
    assert_eq!(body, "Bookstore backend is running");
    Ok(())
}

#[actix_web::test]
async fn test_health_reports_database() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state(Arc::new(FakeMediaHost::default())).await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "ok");
    assert_eq!(body["app_version"], env!("CARGO_PKG_VERSION"));
    assert!(body["time"].as_str().is_some_and(|t| t.contains('T')));
    Ok(())
}

/// Store for a state that has no database at all.
struct EmptyStore;

#[async_trait]
impl CredentialStore for EmptyStore {
    async fn find_by_identifier(
        &self,
        _subject_id: &str,
    ) -> Result<Option<CredentialRecord>, DomainError> {
        Ok(None)
    }

    async fn find_by_username_or_email(
        &self,
        _username: &str,
        _email: &str,
    ) -> Result<Option<CredentialRecord>, DomainError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<CredentialRecord>, DomainError> {
        Ok(None)
    }

    async fn create(&self, _new: NewCredential) -> Result<CredentialRecord, DomainError> {
        Err(DomainError::validation("read-only store"))
    }
}

#[actix_web::test]
async fn test_health_without_database() -> Result<(), Box<dyn std::error::Error>> {
    let state = StateBuilder::new(test_security())
        .with_credentials(Arc::new(EmptyStore))
        .build()
        .await?;
    let app = create_test_app(state).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db"], "not_configured");
    Ok(())
}
