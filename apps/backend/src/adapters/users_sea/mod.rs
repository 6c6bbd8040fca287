//! SeaORM adapter for user rows, plus the `CredentialStore` built on it.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    NotSet, QueryFilter, Set,
};

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;
use crate::repos::users::{CredentialRecord, CredentialStore, NewCredential};

pub mod dto;

pub use dto::UserCreate;

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Sub.eq(sub))
        .one(conn)
        .await
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
}

pub async fn find_by_username_or_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(
            Condition::any()
                .add(users::Column::Username.eq(username))
                .add(users::Column::Email.eq(email)),
        )
        .one(conn)
        .await
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: NotSet,
        sub: Set(dto.sub),
        username: Set(dto.username),
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        created_at: Set(now),
        updated_at: Set(now),
    };

    user_active.insert(conn).await
}

pub async fn delete_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<u64, sea_orm::DbErr> {
    let res = users::Entity::delete_many()
        .filter(users::Column::Sub.eq(sub))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

impl From<users::Model> for CredentialRecord {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            sub: model.sub,
            username: model.username,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Credential store backed by the `users` table.
#[derive(Clone)]
pub struct SeaCredentialStore {
    db: DatabaseConnection,
}

impl SeaCredentialStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CredentialStore for SeaCredentialStore {
    async fn find_by_identifier(
        &self,
        subject_id: &str,
    ) -> Result<Option<CredentialRecord>, DomainError> {
        let found = find_by_sub(&self.db, subject_id).await.map_err(map_db_err)?;
        Ok(found.map(CredentialRecord::from))
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<CredentialRecord>, DomainError> {
        let found = find_by_username_or_email(&self.db, username, email)
            .await
            .map_err(map_db_err)?;
        Ok(found.map(CredentialRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>, DomainError> {
        let found = find_by_email(&self.db, email).await.map_err(map_db_err)?;
        Ok(found.map(CredentialRecord::from))
    }

    async fn create(&self, new: NewCredential) -> Result<CredentialRecord, DomainError> {
        let dto = UserCreate::new(new.sub, new.username, new.email, new.password_hash);
        let created = create_user(&self.db, dto).await.map_err(map_db_err)?;
        Ok(CredentialRecord::from(created))
    }
}
