use actix_web::error::ResponseError;
use actix_web::http::{header, StatusCode};
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::authenticator::{AuthError, UnauthReason};
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::ErrorCode;
use crate::infra::db_errors::map_db_err;
use crate::media::MediaError;
use crate::trace_ctx;

const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Unauthenticated: {reason}")]
    Unauthenticated { reason: UnauthReason },
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Credential store unavailable: {detail}")]
    StoreUnavailable { detail: String },
    #[error("Database error: {detail}")]
    Db { detail: String },
    #[error("Media host error: {detail}")]
    Media { code: ErrorCode, detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. }
            | AppError::BadRequest { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::NotFound { code, .. }
            | AppError::Conflict { code, .. }
            | AppError::Media { code, .. } => *code,
            AppError::Unauthenticated { reason } => reason.code(),
            AppError::StoreUnavailable { .. } => ErrorCode::StoreUnavailable,
            AppError::Db { .. } => ErrorCode::DbError,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    /// Client-facing message. Server-side failures never expose their detail.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation { detail, .. }
            | AppError::BadRequest { detail, .. }
            | AppError::Forbidden { detail, .. }
            | AppError::NotFound { detail, .. }
            | AppError::Conflict { detail, .. } => detail.clone(),
            AppError::Unauthenticated { reason } => reason.message().to_string(),
            AppError::StoreUnavailable { .. } => {
                "Service temporarily unavailable. Please try again later.".to_string()
            }
            AppError::Media {
                code: ErrorCode::MediaNotConfigured,
                ..
            } => "Image hosting is not configured.".to_string(),
            AppError::Media { .. } => "Image upload failed. Please try again later.".to_string(),
            AppError::Db { .. } | AppError::Internal { .. } | AppError::Config { .. } => {
                SERVER_ERROR_MESSAGE.to_string()
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Media { .. } => StatusCode::BAD_GATEWAY,
            AppError::Db { .. } | AppError::Internal { .. } | AppError::Config { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn invalid(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Validation {
            code,
            detail: detail.into(),
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn unauthenticated(reason: UnauthReason) -> Self {
        Self::Unauthenticated { reason }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn store_unavailable(detail: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            detail: detail.into(),
        }
    }

    pub fn db(detail: impl Into<String>) -> Self {
        Self::Db {
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(detail) => AppError::invalid(ErrorCode::ValidationError, detail),
            DomainError::Conflict(ConflictKind::UniqueUsername | ConflictKind::UniqueEmail, _) => {
                AppError::bad_request(
                    ErrorCode::UsernameOrEmailTaken,
                    "Username or email already in use.",
                )
            }
            DomainError::Conflict(ConflictKind::UniqueSubject, detail) => {
                AppError::conflict(ErrorCode::UniqueViolation, detail)
            }
            DomainError::Conflict(_, detail) => AppError::conflict(ErrorCode::Conflict, detail),
            DomainError::NotFound(NotFoundKind::Book, _) => {
                AppError::not_found(ErrorCode::BookNotFound, "Book not found")
            }
            DomainError::NotFound(NotFoundKind::User, _) => {
                AppError::not_found(ErrorCode::UserNotFound, "User not found")
            }
            DomainError::NotFound(_, detail) => AppError::not_found(ErrorCode::NotFound, detail),
            DomainError::Infra(InfraErrorKind::DbUnavailable | InfraErrorKind::Timeout, detail) => {
                AppError::store_unavailable(detail)
            }
            DomainError::Infra(_, detail) => AppError::db(detail),
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthenticated(reason) => AppError::unauthenticated(reason),
            AuthError::StoreUnavailable => {
                AppError::store_unavailable("credential store lookup failed")
            }
        }
    }
}

impl From<MediaError> for AppError {
    fn from(e: MediaError) -> Self {
        let code = match e {
            MediaError::NotConfigured => ErrorCode::MediaNotConfigured,
            _ => ErrorCode::MediaUpstream,
        };
        AppError::Media {
            code,
            detail: e.to_string(),
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        AppError::from(map_db_err(e))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(trace_id = %trace_id, code = %self.code(), error = %self, "request failed");
        }

        let body = ErrorBody {
            message: self.message(),
            code: self.code().as_str(),
            trace_id: trace_id.clone(),
        };

        let mut builder = HttpResponse::build(status);
        builder.insert_header(("x-trace-id", trace_id));

        match status {
            StatusCode::UNAUTHORIZED => {
                builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
            }
            StatusCode::SERVICE_UNAVAILABLE => {
                builder.insert_header((header::RETRY_AFTER, "5"));
            }
            _ => {}
        }

        builder.json(body)
    }
}
