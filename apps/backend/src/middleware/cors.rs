use std::env;

use actix_cors::Cors;
use actix_web::http::header;

const DEV_ORIGINS: &[&str] = &["http://localhost:8081", "http://localhost:19006"];

/// Origins from `CORS_ALLOWED_ORIGINS` (comma-separated), keeping only
/// `http://` / `https://` entries. Empty or invalid input yields `None`.
pub fn allowed_origins_from(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(str::to_string)
        .collect();
    (!origins.is_empty()).then_some(origins)
}

/// CORS for the mobile/web client. Only the methods and headers the API uses.
pub fn cors_middleware() -> Cors {
    let origins = allowed_origins_from(&env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default())
        .unwrap_or_else(|| DEV_ORIGINS.iter().map(|s| s.to_string()).collect());

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .max_age(3600);

    for origin in origins {
        cors = cors.allowed_origin(&origin);
    }
    cors
}
