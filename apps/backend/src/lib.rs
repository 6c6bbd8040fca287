#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod keepalive;
pub mod logging;
pub mod media;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::authenticator::{AuthError, SessionAuthenticator, UnauthReason, VerifiedIdentity};
pub use auth::token::{decode_token, encode_token, TokenError, DEFAULT_TOKEN_TTL};
pub use config::app::AppConfig;
pub use config::db::{db_url, DbKind};
pub use error::AppError;
pub use extractors::current_user::CurrentUser;
pub use infra::db::{bootstrap_db, connect_db};
pub use infra::state::StateBuilder;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::session_auth::SessionAuth;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
