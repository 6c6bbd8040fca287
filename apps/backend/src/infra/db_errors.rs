//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos and the credential store convert
//! it here, and higher layers map `DomainError` to `AppError` via `From`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Which unique key was hit, from either the SQLite `table.column` form or
/// the Postgres constraint name.
fn unique_conflict_kind(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    let keys = [
        (
            "users.username",
            "users_username_key",
            ConflictKind::UniqueUsername,
            "Username already in use",
        ),
        (
            "users.email",
            "users_email_key",
            ConflictKind::UniqueEmail,
            "Email already in use",
        ),
        (
            "users.sub",
            "users_sub_key",
            ConflictKind::UniqueSubject,
            "Subject identifier already in use",
        ),
    ];

    keys.into_iter()
        .find(|(sqlite, pg, _, _)| error_msg.contains(sqlite) || error_msg.contains(pg))
        .map(|(_, _, kind, detail)| (kind, detail))
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(
                NotFoundKind::Other("Record".into()),
                "Record not found",
            );
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        if let Some((kind, detail)) = unique_conflict_kind(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation("Referenced record does not exist");
    }

    if error_msg.contains("timeout") || error_msg.contains("pool timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbErr, RuntimeErr};

    use super::*;

    fn exec_err(msg: &str) -> DbErr {
        DbErr::Exec(RuntimeErr::Internal(msg.to_string()))
    }

    #[test]
    fn test_sqlite_unique_email() {
        let mapped = map_db_err(exec_err("UNIQUE constraint failed: users.email"));
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::UniqueEmail, _)
        ));
    }

    #[test]
    fn test_postgres_unique_username() {
        let mapped = map_db_err(exec_err(
            "error returned from database: duplicate key value violates unique constraint \"users_username_key\"",
        ));
        assert!(matches!(
            mapped,
            DomainError::Conflict(ConflictKind::UniqueUsername, _)
        ));
    }

    #[test]
    fn test_connection_loss_is_unavailable() {
        let mapped = map_db_err(DbErr::Conn(RuntimeErr::Internal("refused".into())));
        assert!(matches!(
            mapped,
            DomainError::Infra(InfraErrorKind::DbUnavailable, _)
        ));
    }

    #[test]
    fn test_unknown_error_is_generic_infra() {
        let mapped = map_db_err(exec_err("disk I/O error"));
        assert!(matches!(mapped, DomainError::Infra(InfraErrorKind::Other(_), _)));
    }
}
