use crate::models::reservation::{Reservation, Seat, CABIN_COLUMNS, CABIN_ROWS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Reserved,
}

/// Occupancy grid derived from a set of reservations
///
/// Never stored; always recomputed from the store so it cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeatMap {
    cells: [[SeatStatus; CABIN_COLUMNS]; CABIN_ROWS],
}

impl SeatMap {
    pub fn compute(reservations: &[Reservation]) -> Self {
        let mut cells = [[SeatStatus::Available; CABIN_COLUMNS]; CABIN_ROWS];

        // Records with impossible coordinates are skipped, not rejected
        for seat in reservations.iter().filter_map(Reservation::seat) {
            cells[seat.row][seat.column] = SeatStatus::Reserved;
        }

        Self { cells }
    }

    /// Status of a seat, `None` when the coordinate is outside the cabin
    pub fn status(&self, row: usize, column: usize) -> Option<SeatStatus> {
        Seat::new(row, column).map(|seat| self.cells[seat.row][seat.column])
    }

    pub fn is_available(&self, row: usize, column: usize) -> bool {
        self.status(row, column) == Some(SeatStatus::Available)
    }

    pub fn reserved_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|status| **status == SeatStatus::Reserved)
            .count()
    }

    pub fn available_count(&self) -> usize {
        CABIN_ROWS * CABIN_COLUMNS - self.reserved_count()
    }
}
