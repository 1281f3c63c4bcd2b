use axum::{
    body::Body as AxumBody,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::warn;

use crate::services::auth_service;
use crate::web::models::AuthenticatedUser;
use crate::web::{error::AppError, AppState};

pub async fn auth(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    // Try to get token from Authorization header first, then fall back to cookie
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))
        .ok_or(AppError::MissingToken)?;

    let claims = auth_service::decode_jwt(&token, &state.config.jwt_secret).map_err(|e| {
        warn!(error = ?e, "JWT decoding error during auth middleware.");
        AppError::InvalidToken
    })?;

    let authenticated_user = AuthenticatedUser {
        id: claims.user_id,
        email: claims.sub,
    };
    req.extensions_mut().insert(authenticated_user);
    Ok(next.run(req).await)
}
