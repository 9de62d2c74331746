use crate::engine::pricing::PricingMatrix;
use crate::engine::seat_map::SeatMap;
use crate::models::reservation::Reservation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Public cabin view: occupancy plus the price of every seat
#[derive(Debug, Serialize, Deserialize)]
pub struct SeatMapResponse {
    pub seats: SeatMap,
    pub prices: PricingMatrix,
    pub available: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub success: bool,
    pub reservation: Reservation,
    pub price: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub success: bool,
    pub username: String,
    pub seats: SeatMap,
    pub total_sales: u64,
    pub reservations: Vec<Reservation>,
}
