//! Registration and login.

use std::time::SystemTime;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password_blocking, verify_dummy_blocking};
use crate::auth::token::encode_token;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::users::{CredentialRecord, CredentialStore, NewCredential};
use crate::state::security_config::SecurityConfig;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MIN_USERNAME_LEN: usize = 3;

const ALL_FIELDS_REQUIRED: &str = "All fields are required.";
const INVALID_LOGIN: &str = "Invalid email or password.";

#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// User as shown to clients; `id` is the token subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<&CredentialRecord> for PublicUser {
    fn from(r: &CredentialRecord) -> Self {
        Self {
            id: r.sub.clone(),
            username: r.username.clone(),
            email: r.email.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: PublicUser,
    pub token: String,
}

fn validate_registration(input: &RegisterInput) -> Result<(), AppError> {
    if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
        return Err(AppError::invalid(ErrorCode::MissingFields, ALL_FIELDS_REQUIRED));
    }
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid(
            ErrorCode::PasswordTooShort,
            "Password must be at least 6 characters long.",
        ));
    }
    if input.username.chars().count() < MIN_USERNAME_LEN {
        return Err(AppError::invalid(
            ErrorCode::UsernameTooShort,
            "Username must be at least 3 characters long.",
        ));
    }
    Ok(())
}

pub async fn register(
    store: &dyn CredentialStore,
    security: &SecurityConfig,
    input: RegisterInput,
    now: SystemTime,
) -> Result<AuthSession, AppError> {
    validate_registration(&input)?;

    if store
        .find_by_username_or_email(&input.username, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::bad_request(
            ErrorCode::UsernameOrEmailTaken,
            "Username or email already in use.",
        ));
    }

    let password_hash = hash_password_blocking(input.password.clone()).await?;
    // A concurrent registration can still win the race; the unique index
    // rejects it and the conflict maps to the same 400.
    let record = store
        .create(NewCredential {
            sub: Uuid::new_v4().to_string(),
            username: input.username,
            email: input.email,
            password_hash,
        })
        .await?;

    let token = encode_token(&record.sub, security, now)?;
    info!(user_id = record.id, email = %Redacted(&record.email), "user registered");

    Ok(AuthSession {
        user: PublicUser::from(&record),
        token,
    })
}

pub async fn login(
    store: &dyn CredentialStore,
    security: &SecurityConfig,
    input: LoginInput,
    now: SystemTime,
) -> Result<AuthSession, AppError> {
    if input.email.is_empty() || input.password.is_empty() {
        return Err(AppError::invalid(ErrorCode::MissingFields, ALL_FIELDS_REQUIRED));
    }

    let Some(record) = store.find_by_email(&input.email).await? else {
        // Same argon2 cost as a wrong password.
        verify_dummy_blocking(input.password.clone()).await;
        security::login_failed("unknown_email", Some(&input.email));
        return Err(AppError::bad_request(ErrorCode::InvalidCredentials, INVALID_LOGIN));
    };

    if !store.verify_secret(&record, &input.password).await {
        security::login_failed("wrong_password", Some(&input.email));
        return Err(AppError::bad_request(ErrorCode::InvalidCredentials, INVALID_LOGIN));
    }

    let token = encode_token(&record.sub, security, now)?;
    Ok(AuthSession {
        user: PublicUser::from(&record),
        token,
    })
}
