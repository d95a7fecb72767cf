//! User and availability endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;

use legends_core::directory::AvailabilityRecord;
use legends_core::overlay::{self, Occupancy};
use legends_core::roster::SelectedRoster;
use legends_core::sync::RemoteUpdate;
use legends_core::{TimeRange, UserId, UserProfile};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/availability/{user}",
            get(get_availability)
                .put(put_availability)
                .delete(delete_availability),
        )
        .route("/occupancy", get(get_occupancy))
}

/// GET /users - List the user directory
async fn list_users(State(state): State<AppState>) -> Json<Vec<UserProfile>> {
    let planner = state.planner().read().await;
    Json(planner.users().iter().cloned().collect())
}

/// GET /availability/{user} - Committed ranges for one user
async fn get_availability(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<AvailabilityRecord>, AppError> {
    let planner = state.planner().read().await;
    planner.users().require(&user_id)?;

    let record = planner
        .directory()
        .record(&user_id)
        .cloned()
        .unwrap_or_else(|| AvailabilityRecord::new(UserId::from(user_id), Vec::new()));

    Ok(Json(record))
}

/// PUT /availability/{user} - Replace a user's committed ranges
async fn put_availability(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(ranges): Json<Vec<TimeRange>>,
) -> Result<Json<AvailabilityRecord>, AppError> {
    let mut planner = state.planner().write().await;
    let user_id = planner.users().require(&user_id)?.id.clone();

    // The planner merges ranges and attaches the owner's metadata
    planner.apply_remote(RemoteUpdate::Record {
        record: AvailabilityRecord::new(user_id.clone(), ranges),
    });
    state.persist(&planner)?;

    let record = planner
        .directory()
        .record(user_id.as_str())
        .cloned()
        .unwrap_or_else(|| AvailabilityRecord::new(user_id.clone(), Vec::new()));

    tracing::info!(user = %user_id, ranges = record.ranges.len(), "availability replaced");
    Ok(Json(record))
}

/// DELETE /availability/{user} - Drop a user's committed ranges
async fn delete_availability(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Option<AvailabilityRecord>>, AppError> {
    let mut planner = state.planner().write().await;
    planner.users().require(&user_id)?;

    let removed = planner.directory().record(&user_id).cloned();
    planner.apply_remote(RemoteUpdate::Removed {
        user_id: UserId::from(user_id),
    });
    state.persist(&planner)?;

    Ok(Json(removed))
}

#[derive(Deserialize)]
pub struct OccupancyQuery {
    /// Comma-separated user ids. Defaults to the saved roster.
    roster: Option<String>,
}

/// GET /occupancy?roster=a,b - Free-member count per slot
async fn get_occupancy(
    State(state): State<AppState>,
    Query(query): Query<OccupancyQuery>,
) -> Result<Json<Occupancy>, AppError> {
    let planner = state.planner().read().await;

    let Some(list) = query.roster else {
        return Ok(Json(planner.occupancy()));
    };

    let roster: SelectedRoster = list
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(UserId::from)
        .collect();
    for id in &roster {
        planner.users().require(id.as_str())?;
    }

    Ok(Json(overlay::occupancy(planner.directory(), &roster)))
}
