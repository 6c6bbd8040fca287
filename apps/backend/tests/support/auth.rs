use std::time::SystemTime;

use bookstore_backend::auth::token::encode_token;
use bookstore_backend::state::security_config::SecurityConfig;

pub const TEST_SECRET: &[u8] = b"test_secret_key_for_testing_purposes_only";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_SECRET)
}

/// Token for `sub` signed with the test secret, issued at `issued_at`.
pub fn token_issued_at(sub: &str, issued_at: SystemTime) -> String {
    encode_token(sub, &test_security(), issued_at).expect("encode test token")
}

pub fn fresh_token(sub: &str) -> String {
    token_issued_at(sub, SystemTime::now())
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
