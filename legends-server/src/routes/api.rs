//! Liveness endpoints

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/hello", get(hello))
        .route("/ping", get(ping))
}

/// GET /api/hello
async fn hello() -> &'static str {
    "Hello World Api!"
}

/// GET /ping
async fn ping() -> &'static str {
    "pong!"
}
