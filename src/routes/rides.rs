use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::error::{AppError, MatchError};
use crate::state::AppState;
use crate::types::activity::{DerivedRow, FileFormat, RideSummary};
use crate::types::reference::{AnimalComparison, PeakMatch, RouteMatch};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/rides/:session_id", get(ride).delete(end_session))
        .route("/api/rides/:session_id/track", get(track))
}

#[derive(Serialize)]
struct FunStats {
    closest_route: Option<RouteMatch>,
    closest_peak: Option<PeakMatch>,
    animals: Option<AnimalComparison>,
}

#[derive(Serialize)]
struct RideResponse {
    session_id: String,
    file_name: String,
    file_type: FileFormat,
    summary: RideSummary,
    fun_stats: FunStats,
}

fn matched<T>(result: Result<T, MatchError>) -> Option<T> {
    result
        .map_err(|e| tracing::debug!("Reference lookup: {}", e))
        .ok()
}

async fn ride(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<RideResponse>, AppError> {
    let session = state
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(session_id.clone()))?;

    let summary = &session.summary;
    // Short rides have no windowed peak; compare the average speed instead.
    let compared_speed = summary
        .fastest_windowed
        .map(|w| w.speed_kmh)
        .unwrap_or(summary.average_speed_kmh);

    let fun_stats = FunStats {
        closest_route: matched(state.references.closest_route(summary.distance_km)),
        closest_peak: matched(state.references.closest_peak(summary.elevation_gain_m)),
        animals: matched(state.references.compare_animals(compared_speed)),
    };

    Ok(Json(RideResponse {
        session_id,
        file_name: session.file_name.clone(),
        file_type: session.file_format,
        summary: summary.clone(),
        fun_stats,
    }))
}

async fn track(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<DerivedRow>>, AppError> {
    let session = state
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(session_id.clone()))?;

    Ok(Json(session.derived.rows().to_vec()))
}

async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !state.remove(&session_id) {
        return Err(AppError::NotFound(session_id));
    }
    tracing::info!("Ended session {}", session_id);
    Ok(StatusCode::NO_CONTENT)
}
