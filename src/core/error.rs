// Centralized error handling for the reservation service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::responses::ErrorResponse;

/// Errors surfaced by booking and admin operations
///
/// Every variant is recoverable and maps to its own HTTP status so the
/// presentation layer can tell them apart.
#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Seat ({row}, {column}) is outside the cabin")]
    InvalidSeat { row: i64, column: i64 },

    #[error("Seat ({row}, {column}) is already reserved")]
    SeatTaken { row: usize, column: usize },

    #[error("Invalid username or password")]
    AuthFailure,

    #[error("Administrator login required")]
    Unauthorized,

    #[error("Reservation {0} not found")]
    NotFound(u64),

    #[error("Storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl IntoResponse for ReservationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReservationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ReservationError::InvalidSeat { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ReservationError::SeatTaken { .. } => StatusCode::CONFLICT,
            ReservationError::AuthFailure => StatusCode::UNAUTHORIZED,
            ReservationError::Unauthorized => StatusCode::FORBIDDEN,
            ReservationError::NotFound(_) => StatusCode::NOT_FOUND,
            ReservationError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Storage details stay in the logs
        let error = match &self {
            ReservationError::Storage(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (
            status,
            Json(ErrorResponse {
                success: false,
                error,
            }),
        )
            .into_response()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PricingError {
    #[error("No price for seat ({row}, {column}): out of range")]
    OutOfRange { row: i64, column: i64 },
}
