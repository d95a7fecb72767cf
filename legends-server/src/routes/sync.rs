//! Replication endpoints: full snapshot, outbox and remote updates

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};

use legends_core::store::Snapshot;
use legends_core::sync::{LocalWrite, RemoteUpdate};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/snapshot", get(get_snapshot))
        .route("/outbox", post(drain_outbox))
        .route("/remote", post(apply_remote))
}

/// GET /snapshot - Full planner state
async fn get_snapshot(State(state): State<AppState>) -> Json<Snapshot> {
    let planner = state.planner().read().await;
    Json(planner.snapshot())
}

/// POST /outbox - Take all queued local writes
async fn drain_outbox(State(state): State<AppState>) -> Result<Json<Vec<LocalWrite>>, AppError> {
    let mut planner = state.planner().write().await;
    let writes = planner.drain_outbox();
    state.persist(&planner)?;

    Ok(Json(writes))
}

/// POST /remote - Apply a change from another client
async fn apply_remote(
    State(state): State<AppState>,
    Json(update): Json<RemoteUpdate>,
) -> Result<Json<Snapshot>, AppError> {
    let mut planner = state.planner().write().await;
    planner.apply_remote(update);
    state.persist(&planner)?;

    Ok(Json(planner.snapshot()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::routes::test_support::{get, json, send, test_app};

    #[tokio::test]
    async fn test_snapshot() {
        let app = test_app();
        let (status, body) = send(&app, get("/snapshot")).await;
        assert_eq!(status, StatusCode::OK);

        let snapshot: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(snapshot["session"]["userId"], "0");
        assert_eq!(snapshot["records"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_remote_roster_drops_editing_user() {
        let app = test_app();
        let update = json!({ "kind": "roster", "roster": ["0", "2"] });
        let (status, body) = send(&app, json("POST", "/remote", update)).await;
        assert_eq!(status, StatusCode::OK);

        let snapshot: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(snapshot["roster"], json!(["2"]));
    }

    #[tokio::test]
    async fn test_outbox_starts_empty() {
        let app = test_app();
        let (status, body) = send(&app, json("POST", "/outbox", json!(null))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }
}
