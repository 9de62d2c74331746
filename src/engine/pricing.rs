use crate::core::error::PricingError;
use crate::models::reservation::{Seat, CABIN_COLUMNS, CABIN_ROWS};
use serde::{Deserialize, Serialize};

/// Fare for each seat column; identical for every row
const ROW_FARES: [u32; CABIN_COLUMNS] = [100, 75, 50, 100];

/// Fixed 12x4 price table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PricingMatrix {
    prices: [[u32; CABIN_COLUMNS]; CABIN_ROWS],
}

impl PricingMatrix {
    pub fn new() -> Self {
        Self {
            prices: [ROW_FARES; CABIN_ROWS],
        }
    }

    pub fn price_of(&self, row: i64, column: i64) -> Result<u32, PricingError> {
        Seat::from_coordinates(row, column)
            .map(|seat| self.price_of_seat(seat))
            .ok_or(PricingError::OutOfRange { row, column })
    }

    pub fn price_of_seat(&self, seat: Seat) -> u32 {
        self.prices[seat.row][seat.column]
    }
}

impl Default for PricingMatrix {
    fn default() -> Self {
        Self::new()
    }
}
