use actix_web::{web, HttpResponse};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::state::app_state::AppState;

pub async fn root() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Bookstore backend is running")
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    db: &'static str,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let time = OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    let db = match app_state.db() {
        Some(conn) => {
            let probe = Statement::from_string(conn.get_database_backend(), "SELECT 1");
            match conn.query_one(probe).await {
                Ok(_) => "ok",
                Err(e) => {
                    tracing::warn!(error = %e, "health check database probe failed");
                    "error"
                }
            }
        }
        None => "not_configured",
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        db,
        time,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::get().to(health)));
}
