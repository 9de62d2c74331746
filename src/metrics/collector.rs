use crate::auth::session::SessionStore;
use crate::engine::pricing::PricingMatrix;
use crate::engine::sales;
use crate::engine::seat_map::SeatMap;
use crate::stores::reservation_store::ReservationStore;
use crate::utils::time::{current_timestamp, elapsed_seconds};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct Metrics {
    pub booking_attempts: AtomicU64,
    pub successful_bookings: AtomicU64,
    pub seat_conflicts: AtomicU64,
    pub rejected_bookings: AtomicU64,
    pub cancellations: AtomicU64,
    pub failed_logins: AtomicU64,
    pub start_time: i64,
}

#[derive(Debug, Clone, Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub booking_attempts: u64,
    pub successful_bookings: u64,
    pub seat_conflicts: u64,
    pub rejected_bookings: u64,
    pub cancellations: u64,
    pub failed_logins: u64,
    pub success_rate: f64,
    pub reserved_seats: usize,
    pub available_seats: usize,
    pub total_sales: u64,
    pub active_sessions: usize,
    pub uptime_seconds: i64,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            booking_attempts: AtomicU64::new(0),
            successful_bookings: AtomicU64::new(0),
            seat_conflicts: AtomicU64::new(0),
            rejected_bookings: AtomicU64::new(0),
            cancellations: AtomicU64::new(0),
            failed_logins: AtomicU64::new(0),
            start_time: current_timestamp(),
        }
    }

    pub fn increment_attempts(&self) {
        self.booking_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_successful(&self) {
        self.successful_bookings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_conflicts(&self) {
        self.seat_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    /// Bookings refused for bad input or an invalid seat
    pub fn increment_rejected(&self) {
        self.rejected_bookings.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cancellations(&self) {
        self.cancellations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_failed_logins(&self) {
        self.failed_logins.fetch_add(1, Ordering::Relaxed);
    }

    /// Combines the counters with the current cabin state
    pub fn get_snapshot(
        &self,
        reservations: &ReservationStore,
        pricing: &PricingMatrix,
        sessions: &SessionStore,
    ) -> MetricsSnapshot {
        let booking_attempts = self.booking_attempts.load(Ordering::Relaxed);
        let successful_bookings = self.successful_bookings.load(Ordering::Relaxed);

        let success_rate = if booking_attempts > 0 {
            (successful_bookings as f64 / booking_attempts as f64) * 100.0
        } else {
            0.0
        };

        let current = reservations.list();
        let seat_map = SeatMap::compute(&current);

        MetricsSnapshot {
            booking_attempts,
            successful_bookings,
            seat_conflicts: self.seat_conflicts.load(Ordering::Relaxed),
            rejected_bookings: self.rejected_bookings.load(Ordering::Relaxed),
            cancellations: self.cancellations.load(Ordering::Relaxed),
            failed_logins: self.failed_logins.load(Ordering::Relaxed),
            success_rate,
            reserved_seats: seat_map.reserved_count(),
            available_seats: seat_map.available_count(),
            total_sales: sales::total(&current, pricing),
            active_sessions: sessions.len(),
            uptime_seconds: elapsed_seconds(self.start_time, current_timestamp()),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
