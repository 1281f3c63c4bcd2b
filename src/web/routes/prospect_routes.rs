use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{post, put},
    Json, Router,
};
use std::sync::Arc;

use crate::db::entities::prospect;
use crate::web::error::parse_path_id;
use crate::web::extract::ApiJson;
use crate::web::models::harem_models::{
    CreateProspectRequest, MessageResponse, MoveProspectRequest, ProspectRankUpdate,
    UpdateProspectRequest,
};
use crate::web::models::AuthenticatedUser;
use crate::web::{AppError, AppState};

async fn create_prospect_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CreateProspectRequest>,
) -> Result<(StatusCode, Json<prospect::Model>), AppError> {
    let created = app_state
        .prospect_service
        .create(authenticated_user.id, payload.name.as_deref(), payload.harem_id)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_prospect_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(prospect_id): Path<String>,
    ApiJson(payload): ApiJson<UpdateProspectRequest>,
) -> Result<Json<prospect::Model>, AppError> {
    let prospect_id = parse_path_id(&prospect_id, "Invalid prospect ID")?;
    let updated = app_state
        .prospect_service
        .update(authenticated_user.id, prospect_id, payload)
        .await?;
    Ok(Json(updated))
}

async fn delete_prospect_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(prospect_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let prospect_id = parse_path_id(&prospect_id, "Invalid prospect ID")?;
    app_state
        .prospect_service
        .delete(authenticated_user.id, prospect_id)
        .await?;
    Ok(Json(MessageResponse::new("Prospect deleted successfully")))
}

async fn move_prospect_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<MoveProspectRequest>,
) -> Result<Json<prospect::Model>, AppError> {
    let moved = app_state
        .prospect_service
        .move_to_harem(authenticated_user.id, payload.prospect_id, payload.new_harem_id)
        .await?;
    Ok(Json(moved))
}

async fn reorder_prospects_handler(
    Extension(authenticated_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    ApiJson(updates): ApiJson<Vec<ProspectRankUpdate>>,
) -> Result<Json<MessageResponse>, AppError> {
    app_state
        .prospect_service
        .reorder(authenticated_user.id, &updates)
        .await?;
    Ok(Json(MessageResponse::new("Prospects reordered successfully")))
}

pub fn create_prospect_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/prospect", post(create_prospect_handler))
        .route(
            "/prospects/{id}",
            put(update_prospect_handler).delete(delete_prospect_handler),
        )
        .route("/move-prospect", post(move_prospect_handler))
        .route("/reorder-prospects", post(reorder_prospects_handler))
}
