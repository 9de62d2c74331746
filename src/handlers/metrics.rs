// Metrics endpoint

use crate::core::error::ReservationError;
use crate::core::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::warn;

/// Returns JSON with booking counters, cabin occupancy, revenue,
/// active admin sessions and uptime.
///
/// Requires an admin session.
pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, ReservationError> {
    let session = state.sessions.from_jar(&jar);
    if session.require_logged_in().is_err() {
        warn!("Unauthorized metrics access attempt");
        return Err(ReservationError::Unauthorized);
    }

    let snapshot = state
        .metrics
        .get_snapshot(&state.reservations, &state.pricing, &state.sessions);

    Ok((StatusCode::OK, Json(snapshot)).into_response())
}
