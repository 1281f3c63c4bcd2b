use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;

use crate::db::entities::harem;
use crate::web::error::parse_path_id;
use crate::web::extract::ApiJson;
use crate::web::models::harem_models::{
    HaremNameRequest, HaremOrderUpdate, HaremWithProspects, MessageResponse,
};
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

// --- Route Handlers ---

async fn get_user_harems_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<HaremWithProspects>>, AppError> {
    let harems = app_state
        .harem_service
        .list_for_owner(authenticated_user.id)
        .await?;
    Ok(Json(harems))
}

async fn create_harem_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<HaremNameRequest>,
) -> Result<(StatusCode, Json<harem::Model>), AppError> {
    let created = app_state
        .harem_service
        .create(authenticated_user.id, payload.name.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_harem_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(harem_id): Path<String>,
    ApiJson(payload): ApiJson<HaremNameRequest>,
) -> Result<Json<harem::Model>, AppError> {
    let harem_id = parse_path_id(&harem_id, "Invalid harem ID")?;
    let updated = app_state
        .harem_service
        .rename(authenticated_user.id, harem_id, payload.name.as_deref())
        .await?;
    Ok(Json(updated))
}

async fn delete_harem_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(harem_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let harem_id = parse_path_id(&harem_id, "Invalid harem ID")?;
    app_state
        .harem_service
        .delete(authenticated_user.id, harem_id)
        .await?;
    Ok(Json(MessageResponse::new("Harem deleted successfully")))
}

async fn reorder_harems_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(updates): ApiJson<Vec<HaremOrderUpdate>>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .harem_service
        .reorder(authenticated_user.id, &updates)
        .await?;
    Ok(Json(MessageResponse::new("Harems reordered successfully")))
}

// --- Router ---

pub fn create_harem_router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/user-harems",
            get(get_user_harems_handler).post(create_harem_handler),
        )
        .route(
            "/user-harems/{id}",
            put(update_harem_handler).delete(delete_harem_handler),
        )
        .route("/reorder-harems", post(reorder_harems_handler))
}
