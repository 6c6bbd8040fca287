use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web, App, Error};
use bookstore_backend::config::db::DbKind;
use bookstore_backend::infra::state::StateBuilder;
use bookstore_backend::media::MediaHost;
use bookstore_backend::middleware::{RequestTrace, StructuredLogger, TraceSpan};
use bookstore_backend::routes;
use bookstore_backend::state::app_state::AppState;
use bookstore_backend::AppError;

use super::auth::test_security;

/// Fresh in-memory SQLite state (migrated) with the given media host.
///
/// Every call gets its own private database, so tests never share rows.
pub async fn build_test_state(media: Arc<dyn MediaHost>) -> Result<AppState, AppError> {
    StateBuilder::new(test_security())
        .with_db(DbKind::SqliteMemory)
        .with_media(media)
        .build()
        .await
}

/// The production route table behind the production middleware stack,
/// minus CORS.
pub async fn create_test_app(
    state: AppState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = Error> {
    test::init_service(
        App::new()
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(web::Data::new(state))
            .configure(routes::configure),
    )
    .await
}
