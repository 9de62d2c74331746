use crate::core::error::ReservationError;
use crate::core::state::AppState;
use crate::models::responses::{BookingResponse, SeatMapResponse};
use crate::validation::params::{parse_form, BookSeatForm};
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Cabin occupancy and fares
///
/// GET /seats
pub async fn seat_map_handler(State(state): State<Arc<AppState>>) -> Response {
    let seats = state.engine.seat_map();

    (
        StatusCode::OK,
        Json(SeatMapResponse {
            available: seats.available_count(),
            seats,
            prices: (*state.pricing).clone(),
        }),
    )
        .into_response()
}

/// Reserve one seat
///
/// POST /bookings (form: first_name, last_name, row, column)
pub async fn book_seat_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Response, ReservationError> {
    state.metrics.increment_attempts();

    let result = parse_form::<BookSeatForm>(&body)
        .and_then(BookSeatForm::validate)
        .and_then(|booking| {
            state.engine.reserve_seat(
                &booking.first_name,
                &booking.last_name,
                booking.row,
                booking.column,
            )
        });

    let reservation = match result {
        Ok(reservation) => reservation,
        Err(e) => {
            match &e {
                ReservationError::SeatTaken { row, column } => {
                    state.metrics.increment_conflicts();
                    info!(row = row, column = column, "Booking lost: seat taken");
                }
                ReservationError::InvalidInput(_) | ReservationError::InvalidSeat { .. } => {
                    state.metrics.increment_rejected();
                    warn!(error = %e, "Booking rejected");
                }
                _ => {
                    warn!(error = %e, "Booking failed");
                }
            }
            return Err(e);
        }
    };

    state.metrics.increment_successful();

    let price = reservation
        .seat()
        .map(|seat| state.pricing.price_of_seat(seat))
        .unwrap_or(0);

    Ok((
        StatusCode::CREATED,
        Json(BookingResponse {
            success: true,
            reservation,
            price,
        }),
    )
        .into_response())
}
