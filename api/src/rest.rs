use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/webhooks/clerk", post(handlers::clerk::clerk_webhook))
        .route("/health", get(handlers::health::health))
        .with_state(state)
}
