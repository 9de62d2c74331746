use crate::core::error::ReservationError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Decode a form-encoded request body
///
/// Any decoding failure becomes `InvalidInput`.
pub fn parse_form<T: DeserializeOwned>(body: &[u8]) -> Result<T, ReservationError> {
    serde_urlencoded::from_bytes(body)
        .map_err(|e| ReservationError::InvalidInput(format!("malformed form: {}", e)))
}

/// Body of `POST /bookings`
#[derive(Debug, Deserialize)]
pub struct BookSeatForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub row: Option<String>,
    pub column: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub first_name: String,
    pub last_name: String,
    pub row: i64,
    pub column: i64,
}

impl BookSeatForm {
    /// Checks presence and integer syntax only. Empty names and seats
    /// outside the cabin are left for the booking engine to reject.
    pub fn validate(self) -> Result<ValidatedBooking, ReservationError> {
        let first_name = require(self.first_name, "first_name")?;
        let last_name = require(self.last_name, "last_name")?;
        let row = parse_integer(self.row, "row")?;
        let column = parse_integer(self.column, "column")?;

        Ok(ValidatedBooking {
            first_name,
            last_name,
            row,
            column,
        })
    }
}

/// Body of `POST /admin/login`
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ValidatedLogin {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(self) -> Result<ValidatedLogin, ReservationError> {
        Ok(ValidatedLogin {
            username: require(self.username, "username")?,
            password: require(self.password, "password")?,
        })
    }
}

/// Body of `POST /admin/reservations/delete`
#[derive(Debug, Deserialize)]
pub struct DeleteReservationForm {
    pub id: Option<String>,
}

impl DeleteReservationForm {
    pub fn validate(self) -> Result<u64, ReservationError> {
        let raw = require(self.id, "id")?;
        raw.trim()
            .parse::<u64>()
            .map_err(|_| ReservationError::InvalidInput(format!("id must be a reservation number, got '{}'", raw)))
    }
}

fn require(value: Option<String>, name: &str) -> Result<String, ReservationError> {
    value.ok_or_else(|| ReservationError::InvalidInput(format!("missing required field: {}", name)))
}

fn parse_integer(value: Option<String>, name: &str) -> Result<i64, ReservationError> {
    let raw = require(value, name)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ReservationError::InvalidInput(format!("{} must be an integer, got '{}'", name, raw)))
}
