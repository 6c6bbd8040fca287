//! SeaORM adapter for book rows.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::{books, users};

pub mod dto;

pub use dto::BookCreate;

pub async fn create_book<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: BookCreate,
) -> Result<books::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let book_active = books::ActiveModel {
        id: NotSet,
        title: Set(dto.title),
        caption: Set(dto.caption),
        image: Set(dto.image),
        rating: Set(dto.rating),
        user_id: Set(dto.user_id),
        created_at: Set(now),
        updated_at: Set(now),
    };

    book_active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<books::Model>, sea_orm::DbErr> {
    books::Entity::find_by_id(id).one(conn).await
}

/// Newest first, each book paired with its owner.
pub async fn list_page_with_owner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    offset: u64,
    limit: u64,
) -> Result<Vec<(books::Model, Option<users::Model>)>, sea_orm::DbErr> {
    books::Entity::find()
        .find_also_related(users::Entity)
        .order_by_desc(books::Column::CreatedAt)
        .order_by_desc(books::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await
}

pub async fn count_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    books::Entity::find().count(conn).await
}

pub async fn list_by_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Vec<books::Model>, sea_orm::DbErr> {
    books::Entity::find()
        .filter(books::Column::UserId.eq(user_id))
        .order_by_desc(books::Column::CreatedAt)
        .order_by_desc(books::Column::Id)
        .all(conn)
        .await
}

pub async fn delete_book<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    book: books::Model,
) -> Result<(), sea_orm::DbErr> {
    book.delete(conn).await?;
    Ok(())
}
