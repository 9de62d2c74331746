use crate::core::error::ReservationError;
use crate::engine::ticket::is_valid_ticket;
use crate::models::reservation::{Reservation, Seat};
use crate::utils::time::current_timestamp;
use crate::wal::wal::{Wal, WalOperation};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Durable set of reservations
///
/// Records live in memory and every mutation is appended to the WAL before
/// it becomes visible. A seat index gives constant-time availability checks.
/// The store does not arbitrate between concurrent bookings of the same
/// seat; `BookingEngine` serializes those.
pub struct ReservationStore {
    records: DashMap<u64, Reservation>,
    by_seat: DashMap<Seat, u64>,
    next_id: AtomicU64,
    wal: Arc<Wal>,
}

impl ReservationStore {
    pub fn new(wal: Arc<Wal>) -> Self {
        Self {
            records: DashMap::new(),
            by_seat: DashMap::new(),
            next_id: AtomicU64::new(1),
            wal,
        }
    }

    pub fn find_by_seat(&self, row: usize, column: usize) -> Option<Reservation> {
        let seat = Seat::new(row, column)?;
        let id = *self.by_seat.get(&seat)?;
        self.get(id)
    }

    pub fn create(
        &self,
        passenger_name: &str,
        row: usize,
        column: usize,
        e_ticket: &str,
    ) -> Result<Reservation, ReservationError> {
        let passenger_name = passenger_name.trim();
        if passenger_name.is_empty() {
            return Err(ReservationError::InvalidInput(
                "passenger name must not be empty".to_string(),
            ));
        }

        let seat = Seat::new(row, column).ok_or_else(|| {
            ReservationError::InvalidInput(format!("seat ({}, {}) is out of range", row, column))
        })?;

        if !is_valid_ticket(e_ticket) {
            return Err(ReservationError::InvalidInput(
                "e-ticket must be 12 uppercase hex characters".to_string(),
            ));
        }

        let reservation = Reservation {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            passenger_name: passenger_name.to_string(),
            row: seat.row,
            column: seat.column,
            e_ticket: e_ticket.to_string(),
            created: current_timestamp(),
        };

        self.wal.log_operation(&WalOperation::CreateReservation {
            id: reservation.id,
            row: reservation.row,
            column: reservation.column,
            e_ticket: reservation.e_ticket.clone(),
            created: reservation.created,
            passenger_name: reservation.passenger_name.clone(),
        })?;

        self.by_seat.insert(seat, reservation.id);
        self.records.insert(reservation.id, reservation.clone());

        Ok(reservation)
    }

    /// Delete a reservation and return it
    pub fn delete(&self, id: u64) -> Result<Reservation, ReservationError> {
        if !self.records.contains_key(&id) {
            return Err(ReservationError::NotFound(id));
        }

        self.wal.log_operation(&WalOperation::DeleteReservation { id })?;

        self.remove(id).ok_or(ReservationError::NotFound(id))
    }

    pub fn get(&self, id: u64) -> Option<Reservation> {
        self.records.get(&id).map(|entry| entry.value().clone())
    }

    /// All reservations ordered by id; the order is for display only
    pub fn list(&self) -> Vec<Reservation> {
        let mut reservations: Vec<Reservation> =
            self.records.iter().map(|entry| entry.value().clone()).collect();
        reservations.sort_by_key(|r| r.id);
        reservations
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-insert a reservation read back from the WAL
    ///
    /// Returns false when the record's id or seat is already taken by a
    /// restored record.
    pub fn restore(&self, reservation: Reservation) -> bool {
        if self.records.contains_key(&reservation.id) {
            warn!(
                reservation_id = reservation.id,
                "Replayed reservation reuses a live id, skipping"
            );
            return false;
        }

        let Some(seat) = reservation.seat() else {
            warn!(
                reservation_id = reservation.id,
                row = reservation.row,
                column = reservation.column,
                "Replayed reservation is outside the cabin, skipping"
            );
            return false;
        };

        if let Some(existing) = self.by_seat.get(&seat) {
            if *existing != reservation.id {
                warn!(
                    reservation_id = reservation.id,
                    existing_id = *existing,
                    row = seat.row,
                    column = seat.column,
                    "Replayed reservation collides with an existing one, skipping"
                );
                return false;
            }
        }

        self.next_id.fetch_max(reservation.id + 1, Ordering::SeqCst);
        self.by_seat.insert(seat, reservation.id);
        self.records.insert(reservation.id, reservation);
        true
    }

    /// Drop a reservation without logging; used for WAL replay
    pub fn remove(&self, id: u64) -> Option<Reservation> {
        let (_, reservation) = self.records.remove(&id)?;
        if let Some(seat) = reservation.seat() {
            self.by_seat.remove_if(&seat, |_, owner| *owner == id);
        }
        Some(reservation)
    }

    /// The current contents expressed as WAL records, for compaction
    pub fn snapshot(&self) -> Vec<WalOperation> {
        self.list()
            .into_iter()
            .map(|r| WalOperation::CreateReservation {
                id: r.id,
                row: r.row,
                column: r.column,
                e_ticket: r.e_ticket,
                created: r.created,
                passenger_name: r.passenger_name,
            })
            .collect()
    }
}
