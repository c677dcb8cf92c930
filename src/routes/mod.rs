//! HTTP routes
//!
//! Assembles the API router on top of the shared `AppState`.

pub mod dashboard_routes;
pub mod detail_entry_routes;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::controllers::detail_entry_controller::DetailEntryController;
use crate::dto::detail_entry_dto::OptionsResponse;
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Full application router
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .route("/api/options", get(options))
        .nest("/api/entries", detail_entry_routes::create_detail_entry_router())
        .nest("/api/dashboard", dashboard_routes::create_dashboard_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "detail-tracker",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn options() -> Json<OptionsResponse> {
    Json(DetailEntryController::options())
}
