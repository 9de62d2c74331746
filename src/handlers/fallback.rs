use crate::models::responses::ErrorResponse;
use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use tracing::debug;

pub async fn fallback_handler(uri: Uri) -> Response {
    debug!(path = %uri.path(), "No route matched");

    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            success: false,
            error: format!(
                "Unknown endpoint {}. Valid endpoints: /seats, /bookings, /admin/login, /admin/logout, /admin/dashboard, /admin/reservations/delete, /admin/metrics, /health",
                uri.path()
            ),
        }),
    )
        .into_response()
}
