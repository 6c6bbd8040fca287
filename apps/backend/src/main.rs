use actix_web::{web, App, HttpServer};
use bookstore_backend::config::app::AppConfig;
use bookstore_backend::config::db::DbKind;
use bookstore_backend::infra::state::StateBuilder;
use bookstore_backend::keepalive::{spawn_keepalive, KEEPALIVE_PERIOD};
use bookstore_backend::media::media_host_from_config;
use bookstore_backend::middleware::{
    cors_middleware, RequestTrace, StructuredLogger, TraceSpan,
};
use bookstore_backend::routes;
use bookstore_backend::state::security_config::SecurityConfig;
use bookstore_backend::telemetry;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, the hosting platform, or `set -a; . ./.env`).
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    let security = SecurityConfig::new(config.jwt_secret.clone()).with_ttl(config.token_ttl);
    if config.media.is_none() {
        info!("CLOUDINARY_* not set; book uploads will be rejected");
    }

    let app_state = match StateBuilder::new(security)
        .with_db(DbKind::Postgres)
        .with_media(media_host_from_config(config.media.as_ref()))
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let shutdown = CancellationToken::new();
    let keepalive = config
        .api_url
        .clone()
        .map(|url| spawn_keepalive(url, KEEPALIVE_PERIOD, shutdown.clone()));

    let (host, port) = config.bind_addr();
    info!(%host, port, "starting bookstore backend");

    let data = web::Data::new(app_state);

    let result = HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await;

    shutdown.cancel();
    if let Some(handle) = keepalive {
        let _ = handle.await;
    }
    result
}
