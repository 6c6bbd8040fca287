use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;
use crate::error::AppError;
use crate::media::MediaHost;
use crate::repos::users::CredentialStore;

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    db: Option<DatabaseConnection>,
    /// Signing secret and token lifetime
    pub security: SecurityConfig,
    pub credentials: Arc<dyn CredentialStore>,
    pub media: Arc<dyn MediaHost>,
}

impl AppState {
    pub fn new(
        db: Option<DatabaseConnection>,
        security: SecurityConfig,
        credentials: Arc<dyn CredentialStore>,
        media: Arc<dyn MediaHost>,
    ) -> Self {
        Self {
            db,
            security,
            credentials,
            media,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }

    /// The database connection, or a 503 when the state was built without one.
    pub fn require_db(&self) -> Result<&DatabaseConnection, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::store_unavailable("no database configured"))
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("db", &self.db.is_some())
            .field("security", &self.security)
            .finish_non_exhaustive()
    }
}
