//! Credential store: the persistence seam the session authenticator and the
//! auth handlers depend on.

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::auth::password;
use crate::errors::domain::DomainError;

/// A stored user. `password_hash` is an argon2 PHC string, never plaintext.
#[derive(Clone, PartialEq)]
pub struct CredentialRecord {
    pub id: i64,
    /// Opaque subject identifier carried in session tokens
    pub sub: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("sub", &self.sub)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Input for [`CredentialStore::create`]; the secret is already hashed.
#[derive(Clone)]
pub struct NewCredential {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up by subject identifier (the token's `subjectId`).
    async fn find_by_identifier(
        &self,
        subject_id: &str,
    ) -> Result<Option<CredentialRecord>, DomainError>;

    /// First record whose username or email matches.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<CredentialRecord>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, DomainError>;

    async fn create(&self, new: NewCredential) -> Result<CredentialRecord, DomainError>;

    /// Runs argon2 off the async worker.
    async fn verify_secret(&self, record: &CredentialRecord, plaintext: &str) -> bool {
        password::verify_password_blocking(record.password_hash.clone(), plaintext.to_string())
            .await
    }
}
