use std::time::SystemTime;

use actix_web::{web, HttpResponse, Result};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::middleware::session_auth::SessionAuth;
use crate::services::users::{self, AuthSession, LoginInput, PublicUser, RegisterInput};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub user: PublicUser,
    pub token: String,
}

impl SessionResponse {
    fn new(message: &'static str, session: AuthSession) -> Self {
        Self {
            message,
            user: session.user,
            token: session.token,
        }
    }
}

async fn register(
    body: web::Json<RegisterRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = RegisterInput {
        username: body.username,
        email: body.email,
        password: body.password,
    };

    let session = users::register(
        app_state.credentials.as_ref(),
        &app_state.security,
        input,
        SystemTime::now(),
    )
    .await?;

    Ok(HttpResponse::Created().json(SessionResponse::new(
        "User registered successfully.",
        session,
    )))
}

async fn login(
    body: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let input = LoginInput {
        email: body.email,
        password: body.password,
    };

    let session = users::login(
        app_state.credentials.as_ref(),
        &app_state.security,
        input,
        SystemTime::now(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(SessionResponse::new("Login successful.", session)))
}

async fn me(user: CurrentUser) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(&user.0))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)))
        .service(
            web::resource("/me")
                .wrap(SessionAuth)
                .route(web::get().to(me)),
        );
}
