use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbKind};
use crate::error::AppError;

fn connect_options(kind: &DbKind, url: String) -> ConnectOptions {
    let mut opts = ConnectOptions::new(url);
    match kind {
        // One shared connection keeps the in-memory database alive.
        DbKind::SqliteMemory => {
            opts.max_connections(1).min_connections(1);
        }
        DbKind::Postgres => {
            opts.max_connections(10)
                .min_connections(1)
                .connect_timeout(Duration::from_secs(5))
                .acquire_timeout(Duration::from_secs(5));
        }
    }
    opts.sqlx_logging(false);
    opts
}

/// Open a pool for `kind`. Does NOT run migrations.
pub async fn connect_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind.clone())?;
    let conn = Database::connect(connect_options(&kind, url)).await?;

    if kind == DbKind::SqliteMemory {
        conn.execute_unprepared("PRAGMA foreign_keys = ON;").await?;
    }

    Ok(conn)
}

/// Connect and apply pending migrations.
pub async fn bootstrap_db(kind: DbKind) -> Result<DatabaseConnection, AppError> {
    let conn = connect_db(kind.clone()).await?;
    migrate(&conn, MigrationCommand::Up).await?;
    info!(db_kind = ?kind, "database ready");
    Ok(conn)
}
