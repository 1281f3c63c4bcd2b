use axum::{
    extract::{Extension, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::db::services::user_service;
use crate::services::auth_service;
use crate::web::extract::ApiJson;
use crate::web::models::{
    AuthenticatedUser, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
    UserCountResponse, ValidateTokenResponse,
};
use crate::web::{AppError, AppState};

async fn register_handler(
    State(app_state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let response =
        auth_service::register_user(&app_state.db_pool, payload, &app_state.config).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), AppError> {
    let login_response =
        auth_service::login_user(&app_state.db_pool, payload, &app_state.config).await?;

    let auth_cookie = Cookie::build(("token", login_response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    Ok((jar.add(auth_cookie), Json(login_response)))
}

async fn user_count_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<UserCountResponse>, AppError> {
    let count = user_service::count_users(&app_state.db_pool).await?;
    Ok(Json(UserCountResponse {
        success: true,
        user_count: count,
    }))
}

async fn health_check_handler() -> &'static str {
    "Cassanova App is Healthy!"
}

async fn validate_token_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
) -> Json<ValidateTokenResponse> {
    Json(ValidateTokenResponse {
        valid: true,
        user_id: authenticated_user.id,
    })
}

/// Routes reachable without a token.
pub fn create_public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user", post(register_handler))
        .route("/login", post(login_handler))
        .route("/user-count", get(user_count_handler))
        .route("/healthcheck", get(health_check_handler))
}

pub fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/validate-token", get(validate_token_handler))
}
