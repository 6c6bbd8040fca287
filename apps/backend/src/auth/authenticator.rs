//! Session authenticator: bearer token -> verified identity.
//!
//! Steps run in a fixed order and stop at the first failure:
//! header shape, token signature and lifetime, subject lookup.
//! A store outage is reported as [`AuthError::StoreUnavailable`] and is
//! never folded into an authentication failure.

use std::fmt;
use std::time::SystemTime;

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use super::token::decode_token;
use crate::errors::ErrorCode;
use crate::logging::security;
use crate::repos::users::{CredentialRecord, CredentialStore};
use crate::state::security_config::SecurityConfig;

/// Why a request is unauthenticated. The message is what clients see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnauthReason {
    MissingToken,
    InvalidToken,
    UserNotFound,
}

impl UnauthReason {
    pub fn message(&self) -> &'static str {
        match self {
            UnauthReason::MissingToken => "missing token",
            UnauthReason::InvalidToken => "invalid token",
            UnauthReason::UserNotFound => "user not found",
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            UnauthReason::MissingToken => ErrorCode::MissingToken,
            UnauthReason::InvalidToken => ErrorCode::InvalidToken,
            UnauthReason::UserNotFound => ErrorCode::UserNotFound,
        }
    }
}

impl fmt::Display for UnauthReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(UnauthReason),
    #[error("credential store unavailable")]
    StoreUnavailable,
}

/// The caller, as resolved for this request. Carries no secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedIdentity {
    /// Subject identifier; equals the token's `subjectId`
    pub id: String,
    #[serde(skip)]
    pub user_id: i64,
    pub username: String,
    pub email: String,
}

impl From<CredentialRecord> for VerifiedIdentity {
    fn from(record: CredentialRecord) -> Self {
        Self {
            id: record.sub,
            user_id: record.id,
            username: record.username,
            email: record.email,
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header, if well-shaped.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

pub struct SessionAuthenticator<'a> {
    security: &'a SecurityConfig,
    store: &'a dyn CredentialStore,
}

impl<'a> SessionAuthenticator<'a> {
    pub fn new(security: &'a SecurityConfig, store: &'a dyn CredentialStore) -> Self {
        Self { security, store }
    }

    pub async fn authenticate(
        &self,
        headers: &HeaderMap,
        path: &str,
    ) -> Result<VerifiedIdentity, AuthError> {
        self.authenticate_at(headers, path, SystemTime::now()).await
    }

    pub async fn authenticate_at(
        &self,
        headers: &HeaderMap,
        path: &str,
        now: SystemTime,
    ) -> Result<VerifiedIdentity, AuthError> {
        let Some(token) = bearer_token(headers) else {
            security::auth_rejected("missing_token", path);
            return Err(AuthError::Unauthenticated(UnauthReason::MissingToken));
        };

        let claim = decode_token(token, self.security, now).map_err(|e| {
            security::auth_rejected(e.kind(), path);
            AuthError::Unauthenticated(UnauthReason::InvalidToken)
        })?;

        let record = self
            .store
            .find_by_identifier(&claim.subject_id)
            .await
            .map_err(|e| {
                warn!(error = %e, path, "credential lookup failed during authentication");
                AuthError::StoreUnavailable
            })?;

        match record {
            Some(record) => Ok(VerifiedIdentity::from(record)),
            None => {
                security::auth_rejected("user_not_found", path);
                Err(AuthError::Unauthenticated(UnauthReason::UserNotFound))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::{Duration, UNIX_EPOCH};

    use actix_web::http::header::{HeaderName, HeaderValue};
    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;
    use crate::auth::token::{encode_token, DEFAULT_TOKEN_TTL};
    use crate::errors::domain::{DomainError, InfraErrorKind};
    use crate::repos::users::NewCredential;

    /// In-memory store; `down` simulates an unreachable database.
    #[derive(Default)]
    struct FakeStore {
        records: Mutex<Vec<CredentialRecord>>,
        down: bool,
    }

    impl FakeStore {
        fn with_user(sub: &str) -> Self {
            let now = OffsetDateTime::UNIX_EPOCH;
            let store = Self::default();
            store.records.lock().unwrap().push(CredentialRecord {
                id: 7,
                sub: sub.to_string(),
                username: "reader".into(),
                email: "reader@example.test".into(),
                password_hash: "$argon2id$not-a-real-hash".into(),
                created_at: now,
                updated_at: now,
            });
            store
        }

        fn delete_all(&self) {
            self.records.lock().unwrap().clear();
        }
    }

    #[async_trait]
    impl CredentialStore for FakeStore {
        async fn find_by_identifier(
            &self,
            subject_id: &str,
        ) -> Result<Option<CredentialRecord>, DomainError> {
            if self.down {
                return Err(DomainError::infra(InfraErrorKind::DbUnavailable, "down"));
            }
            Ok(self
                .records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.sub == subject_id)
                .cloned())
        }

        async fn find_by_username_or_email(
            &self,
            _username: &str,
            _email: &str,
        ) -> Result<Option<CredentialRecord>, DomainError> {
            unreachable!("not used by the authenticator")
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<CredentialRecord>, DomainError> {
            unreachable!("not used by the authenticator")
        }

        async fn create(&self, _new: NewCredential) -> Result<CredentialRecord, DomainError> {
            unreachable!("not used by the authenticator")
        }
    }

    fn security() -> SecurityConfig {
        SecurityConfig::new(b"authenticator-test-secret".to_vec())
    }

    fn t0() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_750_000_000)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(value).unwrap(),
        );
        headers
    }

    async fn run(store: &FakeStore, headers: &HeaderMap, now: SystemTime) -> Result<VerifiedIdentity, AuthError> {
        let security = security();
        SessionAuthenticator::new(&security, store)
            .authenticate_at(headers, "/api/books", now)
            .await
    }

    fn unauth(reason: UnauthReason) -> Result<VerifiedIdentity, AuthError> {
        Err(AuthError::Unauthenticated(reason))
    }

    #[tokio::test]
    async fn test_accepts_fresh_token_for_existing_user() {
        let store = FakeStore::with_user("u1");
        let token = encode_token("u1", &security(), t0()).unwrap();

        let identity = run(&store, &headers_with(&format!("Bearer {token}")), t0())
            .await
            .unwrap();

        assert_eq!(identity.id, "u1");
        assert_eq!(identity.user_id, 7);
        assert_eq!(identity.username, "reader");
        let json = serde_json::to_value(&identity).unwrap();
        assert!(json.get("user_id").is_none());
        assert!(json.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_missing_header() {
        let store = FakeStore::with_user("u1");
        assert_eq!(
            run(&store, &HeaderMap::new(), t0()).await,
            unauth(UnauthReason::MissingToken)
        );
    }

    #[tokio::test]
    async fn test_header_without_bearer_prefix() {
        let store = FakeStore::with_user("u1");
        let token = encode_token("u1", &security(), t0()).unwrap();

        for value in [
            token.clone(),
            format!("Basic {token}"),
            format!("bearer {token}"),
            "Bearer".to_string(),
            format!("Bearer {token} extra"),
        ] {
            assert_eq!(
                run(&store, &headers_with(&value), t0()).await,
                unauth(UnauthReason::MissingToken),
                "{value}"
            );
        }
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let store = FakeStore::with_user("u1");
        assert_eq!(
            run(&store, &headers_with("Bearer garbage"), t0()).await,
            unauth(UnauthReason::InvalidToken)
        );
    }

    #[tokio::test]
    async fn test_expired_token_looks_like_invalid() {
        let store = FakeStore::with_user("u1");
        let token = encode_token("u1", &security(), t0()).unwrap();
        let later = t0() + DEFAULT_TOKEN_TTL + Duration::from_secs(1);

        assert_eq!(
            run(&store, &headers_with(&format!("Bearer {token}")), later).await,
            unauth(UnauthReason::InvalidToken)
        );
    }

    #[tokio::test]
    async fn test_user_deleted_after_issuance() {
        let store = FakeStore::with_user("u1");
        let token = encode_token("u1", &security(), t0()).unwrap();
        store.delete_all();

        assert_eq!(
            run(&store, &headers_with(&format!("Bearer {token}")), t0()).await,
            unauth(UnauthReason::UserNotFound)
        );
    }

    #[tokio::test]
    async fn test_store_outage_is_not_unauthenticated() {
        let store = FakeStore {
            down: true,
            ..FakeStore::with_user("u1")
        };
        let token = encode_token("u1", &security(), t0()).unwrap();

        assert_eq!(
            run(&store, &headers_with(&format!("Bearer {token}")), t0()).await,
            Err(AuthError::StoreUnavailable)
        );
    }

    #[tokio::test]
    async fn test_bad_token_never_reaches_store() {
        // A down store would turn any lookup into StoreUnavailable.
        let store = FakeStore {
            down: true,
            ..FakeStore::default()
        };
        assert_eq!(
            run(&store, &headers_with("Bearer a.b.c"), t0()).await,
            unauth(UnauthReason::InvalidToken)
        );
    }
}
