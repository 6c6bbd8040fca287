//! Session token codec.
//!
//! Tokens are compact HS256 JWTs whose payload is an [`IdentityClaim`].
//! Decoding checks the signature first and the lifetime second, against an
//! injected clock so expiry is testable.

use std::time::{Duration, SystemTime};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::claims::IdentityClaim;
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

/// Lifetime of a session token unless `JWT_TTL` overrides it.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Malformed, unparsable, or signed with another key
    #[error("token invalid")]
    Invalid,
    /// Well-signed but past `expiresAt`
    #[error("token expired")]
    Expired,
}

impl TokenError {
    /// Stable tag for logs; never sent to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Invalid => "token_invalid",
            TokenError::Expired => "token_expired",
        }
    }
}

/// Issue a token for `subject_id` valid for `security.token_ttl` from `now`.
pub fn encode_token(
    subject_id: &str,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<String, AppError> {
    let claim = IdentityClaim::new(subject_id, now, security.token_ttl);
    if !claim.is_well_formed() {
        return Err(AppError::internal(
            "refusing to issue token with empty subject or non-positive lifetime",
        ));
    }

    encode(
        &Header::new(security.algorithm),
        &claim,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("failed to encode session token: {e}")))
}

/// Verify `token` and return its claim.
pub fn decode_token(
    token: &str,
    security: &SecurityConfig,
    now: SystemTime,
) -> Result<IdentityClaim, TokenError> {
    // Lifetime is checked below against `now`, not the wall clock.
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let claim = decode::<IdentityClaim>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)?;

    if !claim.is_well_formed() {
        return Err(TokenError::Invalid);
    }
    if claim.is_expired_at(now) {
        return Err(TokenError::Expired);
    }
    Ok(claim)
}
