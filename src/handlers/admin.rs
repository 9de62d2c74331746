use crate::auth::session::AdminSession;
use crate::core::error::ReservationError;
use crate::core::state::AppState;
use crate::engine::sales;
use crate::engine::seat_map::SeatMap;
use crate::models::responses::{DashboardResponse, LoginResponse, SuccessResponse};
use crate::validation::params::{parse_form, DeleteReservationForm, LoginForm};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::{info, warn};

/// Start an admin session
///
/// POST /admin/login (form: username, password)
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Bytes,
) -> Result<Response, ReservationError> {
    let login = parse_form::<LoginForm>(&body)?.validate()?;

    let mut session = AdminSession::new();
    if let Err(e) = session.login(state.verifier.as_ref(), &login.username, &login.password) {
        state.metrics.increment_failed_logins();
        warn!(username = %login.username, "Failed admin login");
        return Err(e);
    }

    // A successful login always gets a fresh token
    if let Some(previous) = state.sessions.token_from_jar(&jar) {
        state.sessions.remove(&previous);
    }
    let token = state.sessions.insert(session);

    info!(username = %login.username, "Admin logged in");

    Ok((
        StatusCode::OK,
        jar.add(state.sessions.session_cookie(token)),
        Json(LoginResponse {
            success: true,
            username: login.username,
        }),
    )
        .into_response())
}

/// End the caller's admin session
///
/// POST /admin/logout
pub async fn logout_handler(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(token) = state.sessions.token_from_jar(&jar) {
        if let Some(mut session) = state.sessions.remove(&token) {
            if let Ok(username) = session.require_logged_in() {
                info!(username = %username, "Admin logged out");
            }
            session.logout();
        }
    }

    (
        StatusCode::OK,
        jar.remove(state.sessions.removal_cookie()),
        Json(SuccessResponse {
            success: true,
            message: "Logged out".to_string(),
        }),
    )
        .into_response()
}

/// Occupancy, revenue and every reservation
///
/// GET /admin/dashboard
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<Response, ReservationError> {
    let session = state.sessions.from_jar(&jar);
    let username = session.require_logged_in().map_err(|e| {
        warn!("Unauthorized dashboard access attempt");
        e
    })?;

    let reservations = state.reservations.list();

    Ok((
        StatusCode::OK,
        Json(DashboardResponse {
            success: true,
            username: username.to_string(),
            seats: SeatMap::compute(&reservations),
            total_sales: sales::total(&reservations, &state.pricing),
            reservations,
        }),
    )
        .into_response())
}

/// Delete a reservation and free its seat
///
/// POST /admin/reservations/delete (form: id)
pub async fn delete_reservation_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: Bytes,
) -> Result<Response, ReservationError> {
    let session = state.sessions.from_jar(&jar);
    let username = session.require_logged_in().map_err(|e| {
        warn!("Unauthorized reservation delete attempt");
        e
    })?;

    let id = parse_form::<DeleteReservationForm>(&body)?.validate()?;

    let deleted = state.engine.cancel(id).map_err(|e| {
        warn!(reservation_id = id, error = %e, "Reservation delete failed");
        e
    })?;
    state.metrics.increment_cancellations();

    info!(
        username = %username,
        reservation_id = deleted.id,
        e_ticket = %deleted.e_ticket,
        "Reservation deleted by admin"
    );

    Ok((
        StatusCode::OK,
        Json(SuccessResponse {
            success: true,
            message: format!("Reservation {} deleted", deleted.id),
        }),
    )
        .into_response())
}
