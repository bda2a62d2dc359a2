use axum::routing::{get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all Sablon endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handler::health_handler))
        .route(
            "/sablon",
            get(handler::list_handler).post(handler::create_handler),
        )
        .route(
            "/sablon/",
            get(handler::list_handler).post(handler::create_handler),
        )
        .route("/sablon/sabloane/:id", get(handler::get_handler))
        .route(
            "/sablon/:id",
            put(handler::update_handler).delete(handler::delete_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
