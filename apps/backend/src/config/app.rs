//! Process configuration, read once from the environment at startup.

use std::env;
use std::time::Duration;

use super::db::must_var;
use crate::auth::token::DEFAULT_TOKEN_TTL;
use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Credentials for the hosted image service.
#[derive(Clone)]
pub struct MediaCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for MediaCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: Vec<u8>,
    pub token_ttl: Duration,
    /// Public URL of this service; enables the keepalive ping when set.
    pub api_url: Option<String>,
    pub media: Option<MediaCredentials>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("api_url", &self.api_url)
            .field("media", &self.media)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let host = optional_var("BACKEND_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match optional_var("BACKEND_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!("BACKEND_PORT must be a port number, got '{raw}'"))
            })?,
            None => DEFAULT_PORT,
        };

        let jwt_secret = must_var("JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(AppError::config("JWT_SECRET must not be empty"));
        }

        let token_ttl = match optional_var("JWT_TTL") {
            Some(raw) => parse_ttl(&raw)?,
            None => DEFAULT_TOKEN_TTL,
        };

        Ok(Self {
            host,
            port,
            jwt_secret: jwt_secret.into_bytes(),
            token_ttl,
            api_url: optional_var("API_URL"),
            media: media_from_env()?,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// The three Cloudinary variables are all-or-nothing.
fn media_from_env() -> Result<Option<MediaCredentials>, AppError> {
    let parts = (
        optional_var("CLOUDINARY_CLOUD_NAME"),
        optional_var("CLOUDINARY_API_KEY"),
        optional_var("CLOUDINARY_API_SECRET"),
    );
    match parts {
        (Some(cloud_name), Some(api_key), Some(api_secret)) => Ok(Some(MediaCredentials {
            cloud_name,
            api_key,
            api_secret,
        })),
        (None, None, None) => Ok(None),
        _ => Err(AppError::config(
            "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together",
        )),
    }
}

/// Parse a token lifetime such as `604800`, `90s`, `15m`, `12h` or `7d`.
pub fn parse_ttl(raw: &str) -> Result<Duration, AppError> {
    let raw = raw.trim();
    let invalid = || AppError::config(format!("JWT_TTL is not a valid duration: '{raw}'"));

    let (digits, unit_secs) = match raw.char_indices().last() {
        Some((idx, 's')) => (&raw[..idx], 1),
        Some((idx, 'm')) => (&raw[..idx], 60),
        Some((idx, 'h')) => (&raw[..idx], 60 * 60),
        Some((idx, 'd')) => (&raw[..idx], 24 * 60 * 60),
        Some(_) => (raw, 1),
        None => return Err(invalid()),
    };

    let n: u64 = digits.parse().map_err(|_| invalid())?;
    let secs = n.checked_mul(unit_secs).ok_or_else(invalid)?;
    if secs == 0 {
        return Err(AppError::config("JWT_TTL must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
