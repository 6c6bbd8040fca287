use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::repos::books::Book;
use crate::services::books::{self as book_service, CreateBookInput};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
    pub title: Option<String>,
    pub caption: Option<String>,
    /// Number or numeric string
    pub rating: Option<Value>,
    /// Data URI or remote URL
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize)]
struct BookCreatedResponse {
    message: &'static str,
    book: Book,
}

#[derive(Debug, Serialize)]
struct UserBooksResponse {
    books: Vec<Book>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

/// `None` for absent/null/non-integer values; range is checked by the service.
fn rating_from_json(v: Option<Value>) -> Option<i64> {
    match v? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

async fn create_book(
    user: CurrentUser,
    body: web::Json<CreateBookRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let body = body.into_inner();
    let input = CreateBookInput {
        title: body.title,
        caption: body.caption,
        rating: rating_from_json(body.rating),
        image: body.image,
    };

    let book = book_service::create_book(db, app_state.media.as_ref(), &user, input).await?;

    Ok(HttpResponse::Created().json(BookCreatedResponse {
        message: "Book created successfully",
        book,
    }))
}

async fn list_books(
    _user: CurrentUser,
    query: web::Query<PageQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let page = book_service::list_books(db, query.page, query.limit).await?;
    Ok(HttpResponse::Ok().json(page))
}

async fn list_user_books(
    user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    let books = book_service::list_user_books(db, &user).await?;
    Ok(HttpResponse::Ok().json(UserBooksResponse { books }))
}

async fn delete_book(
    user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = app_state.require_db()?;
    book_service::delete_book(db, app_state.media.as_ref(), &user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Book deleted successfully",
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_books))
            .route(web::post().to(create_book)),
    )
    .service(web::resource("/user").route(web::get().to(list_user_books)))
    .service(web::resource("/{id}").route(web::delete().to(delete_book)));
}
