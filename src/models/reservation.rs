use serde::{Deserialize, Serialize};

/// Number of seat rows in the cabin
pub const CABIN_ROWS: usize = 12;

/// Number of seats per row
pub const CABIN_COLUMNS: usize = 4;

/// A (row, column) coordinate that is known to lie inside the cabin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Seat {
    pub row: usize,
    pub column: usize,
}

impl Seat {
    /// Returns `None` when the coordinate falls outside the 12x4 grid
    pub fn new(row: usize, column: usize) -> Option<Self> {
        if row < CABIN_ROWS && column < CABIN_COLUMNS {
            Some(Self { row, column })
        } else {
            None
        }
    }

    /// Same as [`Seat::new`] but accepts signed input straight from a request
    pub fn from_coordinates(row: i64, column: i64) -> Option<Self> {
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        Self::new(row, column)
    }

    /// Row-major position of this seat, in `0..CABIN_ROWS * CABIN_COLUMNS`
    pub fn index(&self) -> usize {
        self.row * CABIN_COLUMNS + self.column
    }

    pub fn all() -> impl Iterator<Item = Seat> {
        (0..CABIN_ROWS).flat_map(|row| (0..CABIN_COLUMNS).map(move |column| Seat { row, column }))
    }
}

/// A passenger's booking of one seat
///
/// Created by a successful booking and never modified afterwards; the only
/// other transition is deletion by an administrator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Identity assigned by the store
    pub id: u64,
    /// Passenger full name ("First Last")
    pub passenger_name: String,
    pub row: usize,
    pub column: usize,
    /// 12-character uppercase hex e-ticket number
    pub e_ticket: String,
    /// Unix timestamp (UTC seconds) of creation
    pub created: i64,
}

impl Reservation {
    /// The reserved seat, or `None` if the record carries impossible coordinates
    pub fn seat(&self) -> Option<Seat> {
        Seat::new(self.row, self.column)
    }
}
