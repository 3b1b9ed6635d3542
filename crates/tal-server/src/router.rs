//! Router construction for the Tal server.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/brand", get(handlers::brand::brand))
        .route("/api/chat-onboarding", post(handlers::intake::chat_onboarding))
        .route("/api/lead", post(handlers::intake::lead))
        .route("/api/register-lead", post(handlers::intake::register_lead))
        .route("/api/leads", get(handlers::leads::list_leads))
        // Chat widgets are embedded on company pages served from other origins
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
