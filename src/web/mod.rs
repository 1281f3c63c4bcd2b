use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::db::services::{HaremService, ProspectService};
use crate::server::config::ServerConfig;

pub use crate::web::error::AppError;
use crate::web::{middleware::auth, routes::*};

pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub harem_service: Arc<HaremService>,
    pub prospect_service: Arc<ProspectService>,
    pub config: Arc<ServerConfig>,
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origin_list()
        .into_iter()
        .filter_map(|origin| match HeaderValue::from_str(&origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%origin, error = %e, "Ignoring invalid CORS origin.");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn create_axum_router(db_pool: DatabaseConnection, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState {
        harem_service: Arc::new(HaremService::new(db_pool.clone())),
        prospect_service: Arc::new(ProspectService::new(db_pool.clone())),
        db_pool,
        config: config.clone(),
    });

    let protected = harem_routes::create_harem_router()
        .merge(prospect_routes::create_prospect_router())
        .merge(account_routes::create_protected_router())
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::auth));

    Router::new()
        .nest("/api", account_routes::create_public_router().merge(protected))
        .with_state(app_state)
        .layer(axum_middleware::from_fn(middleware::request_log::log_request))
        .layer(cors_layer(&config))
}
