use std::sync::Arc;

use crate::adapters::users_sea::SeaCredentialStore;
use crate::config::db::DbKind;
use crate::error::AppError;
use crate::infra::db::bootstrap_db;
use crate::media::{MediaHost, UnconfiguredMediaHost};
use crate::repos::users::CredentialStore;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    db_kind: Option<DbKind>,
    media: Option<Arc<dyn MediaHost>>,
    credentials: Option<Arc<dyn CredentialStore>>,
}

impl StateBuilder {
    pub fn new(security_config: SecurityConfig) -> Self {
        Self {
            security_config,
            db_kind: None,
            media: None,
            credentials: None,
        }
    }

    pub fn with_db(mut self, kind: DbKind) -> Self {
        self.db_kind = Some(kind);
        self
    }

    pub fn with_media(mut self, media: Arc<dyn MediaHost>) -> Self {
        self.media = Some(media);
        self
    }

    /// Override the credential store (otherwise the SeaORM store over the db).
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let db = match self.db_kind {
            // single entrypoint: build + migrate
            Some(kind) => Some(bootstrap_db(kind).await?),
            None => None,
        };

        let credentials: Arc<dyn CredentialStore> = match (self.credentials, &db) {
            (Some(store), _) => store,
            (None, Some(conn)) => Arc::new(SeaCredentialStore::new(conn.clone())),
            (None, None) => {
                return Err(AppError::config(
                    "a credential store or a database is required",
                ))
            }
        };

        let media: Arc<dyn MediaHost> = match self.media {
            Some(media) => media,
            None => Arc::new(UnconfiguredMediaHost),
        };

        Ok(AppState::new(db, self.security_config, credentials, media))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security() -> SecurityConfig {
        SecurityConfig::new(b"state-builder-secret".to_vec())
    }

    #[tokio::test]
    async fn test_build_without_db_or_store_fails() {
        assert!(StateBuilder::new(security()).build().await.is_err());
    }

    #[tokio::test]
    async fn test_build_with_in_memory_db() {
        let state = StateBuilder::new(security())
            .with_db(DbKind::SqliteMemory)
            .build()
            .await
            .unwrap();
        assert!(state.db().is_some());
        assert!(state
            .credentials
            .find_by_identifier("nobody")
            .await
            .unwrap()
            .is_none());
    }
}
