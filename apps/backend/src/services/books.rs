//! Book creation, listing and deletion.

use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::authenticator::VerifiedIdentity;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::media::{public_id_from_url, MediaHost, BOOKS_FOLDER};
use crate::repos::books::{self, Book, BookCreate, BookWithOwner};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

#[derive(Debug, Clone, Default)]
pub struct CreateBookInput {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub rating: Option<i64>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPage {
    pub books: Vec<BookWithOwner>,
    pub current_page: u64,
    pub total_books: u64,
    pub total_pages: u64,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

pub async fn create_book(
    db: &DatabaseConnection,
    media: &dyn MediaHost,
    owner: &VerifiedIdentity,
    input: CreateBookInput,
) -> Result<Book, AppError> {
    let (Some(title), Some(caption), Some(rating), Some(image)) = (
        non_empty(input.title),
        non_empty(input.caption),
        input.rating,
        non_empty(input.image),
    ) else {
        return Err(AppError::invalid(
            ErrorCode::MissingFields,
            "Image, title, caption, and rating are required",
        ));
    };

    let rating = i16::try_from(rating)
        .ok()
        .filter(|r| (1..=5).contains(r))
        .ok_or_else(|| {
            AppError::invalid(ErrorCode::InvalidRating, "Rating must be between 1 and 5")
        })?;

    let uploaded = media.upload(&image, BOOKS_FOLDER).await?;

    let book = books::create_book(
        db,
        BookCreate {
            title,
            caption,
            image: uploaded.secure_url,
            rating,
            user_id: owner.user_id,
        },
    )
    .await?;

    info!(book_id = book.id, user_id = owner.user_id, "book created");
    Ok(book)
}

/// Resolved paging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub page: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Resolve optional paging parameters; `limit` is capped at [`MAX_LIMIT`].
///
/// The row offset must fit the database's signed 64-bit bind type.
pub fn resolve_paging(page: Option<u64>, limit: Option<u64>) -> Result<Paging, AppError> {
    let invalid = || {
        AppError::invalid(
            ErrorCode::InvalidPagination,
            "page and limit must be positive integers",
        )
    };

    let page = page.unwrap_or(DEFAULT_PAGE);
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if page == 0 || limit == 0 {
        return Err(invalid());
    }
    let limit = limit.min(MAX_LIMIT);

    let offset = (page - 1)
        .checked_mul(limit)
        .filter(|offset| i64::try_from(*offset).is_ok())
        .ok_or_else(invalid)?;

    Ok(Paging {
        page,
        limit,
        offset,
    })
}

pub async fn list_books(
    db: &DatabaseConnection,
    page: Option<u64>,
    limit: Option<u64>,
) -> Result<BookPage, AppError> {
    let Paging {
        page,
        limit,
        offset,
    } = resolve_paging(page, limit)?;

    let books = books::list_page(db, offset, limit).await?;
    let total_books = books::count_books(db).await?;

    Ok(BookPage {
        books,
        current_page: page,
        total_books,
        total_pages: total_books.div_ceil(limit),
    })
}

pub async fn list_user_books(
    db: &DatabaseConnection,
    owner: &VerifiedIdentity,
) -> Result<Vec<Book>, AppError> {
    Ok(books::list_for_user(db, owner.user_id).await?)
}

pub async fn delete_book(
    db: &DatabaseConnection,
    media: &dyn MediaHost,
    owner: &VerifiedIdentity,
    book_id: i64,
) -> Result<(), AppError> {
    let book = books::find_book(db, book_id)
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::BookNotFound, "Book not found"))?;

    if book.user_id != owner.user_id {
        return Err(AppError::forbidden(ErrorCode::Forbidden, "Unauthorized action"));
    }

    // Image cleanup never blocks the delete.
    if media.owns_url(&book.image) {
        match public_id_from_url(&book.image) {
            Some(public_id) => {
                if let Err(e) = media.destroy(&public_id).await {
                    warn!(book_id, public_id = %public_id, error = %e, "image deletion failed");
                }
            }
            None => warn!(book_id, "could not derive public id from image url"),
        }
    }

    books::delete_book(db, book_id).await?;
    info!(book_id, user_id = owner.user_id, "book deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paging_defaults_and_cap() {
        assert_eq!(
            resolve_paging(None, None).unwrap(),
            Paging {
                page: 1,
                limit: 10,
                offset: 0
            }
        );
        assert_eq!(
            resolve_paging(Some(3), Some(500)).unwrap(),
            Paging {
                page: 3,
                limit: MAX_LIMIT,
                offset: 2 * MAX_LIMIT
            }
        );
    }

    #[test]
    fn test_paging_rejects_zero() {
        assert_eq!(
            resolve_paging(Some(0), None).unwrap_err().code(),
            ErrorCode::InvalidPagination
        );
        assert!(resolve_paging(None, Some(0)).is_err());
    }

    #[test]
    fn test_paging_rejects_offset_beyond_i64() {
        for (page, limit) in [(u64::MAX, 100), (u64::MAX, 1), (i64::MAX as u64 / 10 + 2, 10)] {
            assert_eq!(
                resolve_paging(Some(page), Some(limit)).unwrap_err().code(),
                ErrorCode::InvalidPagination,
                "page={page} limit={limit}"
            );
        }

        // Largest offset that still binds.
        let last = resolve_paging(Some(i64::MAX as u64 + 1), Some(1)).unwrap();
        assert_eq!(last.offset, i64::MAX as u64);
    }
}
