pub mod insurance_command_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest(
            "/api",
            insurance_command_routes::create_insurance_command_router(state.clone()),
        )
        .layer(cors_layer(&state.config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Endpoint de salud, sin autenticación
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "insurance-commands",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
