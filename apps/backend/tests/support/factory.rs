use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, Error};
use backend_test_support::unique_helpers::{unique_email, unique_username};
use bookstore_backend::adapters::users_sea::{self, UserCreate};
use bookstore_backend::auth::password::hash_password;
use bookstore_backend::entities::users::Model as User;
use sea_orm::ConnectionTrait;
use serde_json::{json, Value};
use uuid::Uuid;

use super::auth::bearer;

pub const TEST_PASSWORD: &str = "correct-horse";

/// A user registered through the API, with the token it was issued.
#[derive(Debug, Clone)]
pub struct RegisteredUser {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub token: String,
}

/// Insert a user row directly, bypassing the register route.
pub async fn seed_user(
    db: &(impl ConnectionTrait + Send + Sync),
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, sea_orm::DbErr> {
    let password_hash = hash_password(password).expect("hash test password");
    users_sea::create_user(
        db,
        UserCreate::new(Uuid::new_v4().to_string(), username, email, password_hash),
    )
    .await
}

/// Register a unique user through `POST /api/auth/register`.
pub async fn register_user<S>(app: &S, prefix: &str) -> RegisteredUser
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let username = unique_username(prefix);
    let email = unique_email(prefix);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": TEST_PASSWORD,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "registration should succeed");

    let body: Value = test::read_body_json(resp).await;
    RegisteredUser {
        sub: body["user"]["id"].as_str().expect("user id").to_string(),
        username,
        email,
        token: body["token"].as_str().expect("token").to_string(),
    }
}

/// Create a book as `owner` through `POST /api/books`; returns the book JSON.
pub async fn create_book<S>(app: &S, owner: &RegisteredUser, title: &str, rating: i64) -> Value
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/books")
        .insert_header(bearer(&owner.token))
        .set_json(json!({
            "title": title,
            "caption": format!("{title}, reviewed"),
            "rating": rating,
            "image": "data:image/png;base64,iVBORw0KGgo=",
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 201, "book creation should succeed");

    let body: Value = test::read_body_json(resp).await;
    body["book"].clone()
}
