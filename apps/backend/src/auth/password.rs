//! One-way password hashing (argon2id, PHC string format).
//!
//! The async variants run argon2 on tokio's blocking pool so request
//! workers are not stalled by the key derivation.

use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tokio::task;

use crate::error::AppError;

/// Hash with the same parameters as real records, verified when a login
/// names an unknown account so both outcomes cost one argon2 run.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("bookstore-dummy-password").ok());

pub fn hash_password(plaintext: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
}

/// `false` for a wrong password and for a stored hash that does not parse.
pub fn verify_password(stored_hash: &str, plaintext: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Burn one verification against a fixed hash. Always `false`.
pub fn verify_dummy(plaintext: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(hash, plaintext);
    }
    false
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(plaintext: String) -> Result<String, AppError> {
    task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| AppError::internal(format!("password hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking pool. A failed task verifies nothing.
pub async fn verify_password_blocking(stored_hash: String, plaintext: String) -> bool {
    task::spawn_blocking(move || verify_password(&stored_hash, &plaintext))
        .await
        .unwrap_or(false)
}

/// [`verify_dummy`] on the blocking pool.
pub async fn verify_dummy_blocking(plaintext: String) -> bool {
    task::spawn_blocking(move || verify_dummy(&plaintext))
        .await
        .unwrap_or(false)
}
