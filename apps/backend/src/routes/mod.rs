use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{web, HttpRequest};
use tracing::debug;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::middleware::session_auth::SessionAuth;

pub mod auth;
pub mod books;
pub mod health;

/// Book covers arrive as base64 data URIs.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected JSON body");
    let detail = match err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body is too large"
        }
        JsonPayloadError::ContentType => "Content-Type must be application/json",
        _ => "Invalid JSON body",
    };
    AppError::bad_request(ErrorCode::BadRequest, detail).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected query string");
    AppError::invalid(
        ErrorCode::InvalidPagination,
        "page and limit must be positive integers",
    )
    .into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected path parameter");
    AppError::not_found(ErrorCode::BookNotFound, "Book not found").into()
}

/// The full route table, shared by `main` and the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_BODY_LIMIT)
            .error_handler(json_error),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error))
    .app_data(web::PathConfig::default().error_handler(path_error));

    cfg.route("/", web::get().to(health::root));
    cfg.service(web::scope("/health").configure(health::configure_routes));
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
    cfg.service(
        web::scope("/api/books")
            .wrap(SessionAuth)
            .configure(books::configure_routes),
    );
}
