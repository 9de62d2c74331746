use crate::core::error::ReservationError;
use crate::engine::seat_map::SeatMap;
use crate::engine::ticket::TicketNumberGenerator;
use crate::models::reservation::{Reservation, Seat, CABIN_COLUMNS, CABIN_ROWS};
use crate::stores::reservation_store::ReservationStore;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Books and cancels seats
///
/// Each seat has its own mutex. The availability check and the insert for a
/// seat happen while holding it, and so does deletion, so two callers can
/// never both win the same seat.
pub struct BookingEngine {
    store: Arc<ReservationStore>,
    tickets: TicketNumberGenerator,
    seat_locks: Vec<Mutex<()>>,
}

impl BookingEngine {
    pub fn new(store: Arc<ReservationStore>) -> Self {
        Self {
            store,
            tickets: TicketNumberGenerator::new(),
            seat_locks: (0..CABIN_ROWS * CABIN_COLUMNS).map(|_| Mutex::new(())).collect(),
        }
    }

    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    pub fn seat_map(&self) -> SeatMap {
        SeatMap::compute(&self.store.list())
    }

    pub fn reserve_seat(
        &self,
        first_name: &str,
        last_name: &str,
        row: i64,
        column: i64,
    ) -> Result<Reservation, ReservationError> {
        let first_name = first_name.trim();
        let last_name = last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(ReservationError::InvalidInput(
                "first and last name are required".to_string(),
            ));
        }

        let seat = Seat::from_coordinates(row, column)
            .ok_or(ReservationError::InvalidSeat { row, column })?;

        let _guard = self.lock_seat(seat);

        if let Some(existing) = self.store.find_by_seat(seat.row, seat.column) {
            debug!(
                row = seat.row,
                column = seat.column,
                reservation_id = existing.id,
                "Seat already reserved"
            );
            return Err(ReservationError::SeatTaken {
                row: seat.row,
                column: seat.column,
            });
        }

        let passenger_name = format!("{} {}", first_name, last_name);
        let e_ticket = self.tickets.next();
        let reservation = self
            .store
            .create(&passenger_name, seat.row, seat.column, &e_ticket)?;

        info!(
            reservation_id = reservation.id,
            row = seat.row,
            column = seat.column,
            e_ticket = %reservation.e_ticket,
            "Seat reserved"
        );

        Ok(reservation)
    }

    /// Delete a reservation, serialized against bookings of the same seat
    pub fn cancel(&self, id: u64) -> Result<Reservation, ReservationError> {
        let reservation = self.store.get(id).ok_or(ReservationError::NotFound(id))?;

        let _guard = reservation.seat().map(|seat| self.lock_seat(seat));

        let deleted = self.store.delete(id)?;

        info!(
            reservation_id = deleted.id,
            row = deleted.row,
            column = deleted.column,
            "Reservation deleted"
        );

        Ok(deleted)
    }

    // The mutex guards no data, so a poisoned lock is still usable
    fn lock_seat(&self, seat: Seat) -> MutexGuard<'_, ()> {
        self.seat_locks[seat.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
