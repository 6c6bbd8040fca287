//! Book repository functions (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::books_sea as books_adapter;
use crate::entities::{books, users};
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

pub use books_adapter::BookCreate;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub image: String,
    pub rating: i16,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Public projection of a book's owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookOwner {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookWithOwner {
    #[serde(flatten)]
    pub book: Book,
    pub user: Option<BookOwner>,
}

impl From<books::Model> for Book {
    fn from(m: books::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            caption: m.caption,
            image: m.image,
            rating: m.rating,
            user_id: m.user_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<users::Model> for BookOwner {
    fn from(m: users::Model) -> Self {
        Self {
            username: m.username,
            email: m.email,
        }
    }
}

pub async fn create_book<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: BookCreate,
) -> Result<Book, DomainError> {
    let model = books_adapter::create_book(conn, dto)
        .await
        .map_err(map_db_err)?;
    Ok(Book::from(model))
}

pub async fn find_book<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Book>, DomainError> {
    let model = books_adapter::find_by_id(conn, id)
        .await
        .map_err(map_db_err)?;
    Ok(model.map(Book::from))
}

pub async fn list_page<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<Vec<BookWithOwner>, DomainError> {
    let rows = books_adapter::list_page_with_owner(conn, offset, limit)
        .await
        .map_err(map_db_err)?;
    Ok(rows
        .into_iter()
        .map(|(book, owner)| BookWithOwner {
            book: Book::from(book),
            user: owner.map(BookOwner::from),
        })
        .collect())
}

pub async fn count_books<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    books_adapter::count_all(conn).await.map_err(map_db_err)
}

pub async fn list_for_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<Book>, DomainError> {
    let rows = books_adapter::list_by_user(conn, user_id)
        .await
        .map_err(map_db_err)?;
    Ok(rows.into_iter().map(Book::from).collect())
}

/// Returns `false` when the row was already gone.
pub async fn delete_book<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, DomainError> {
    let Some(model) = books_adapter::find_by_id(conn, id)
        .await
        .map_err(map_db_err)?
    else {
        return Ok(false);
    };
    books_adapter::delete_book(conn, model)
        .await
        .map_err(map_db_err)?;
    Ok(true)
}
