// Application state (AppState)

use crate::auth::credentials::{CredentialVerifier, PlaintextVerifier};
use crate::auth::session::SessionStore;
use crate::core::config::Config;
use crate::engine::booking::BookingEngine;
use crate::engine::pricing::PricingMatrix;
use crate::metrics::collector::Metrics;
use crate::stores::{admin_store::AdminStore, reservation_store::ReservationStore};
use crate::wal::wal::Wal;
use std::sync::Arc;

/// Shared application state
///
/// One instance is built at startup and handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    /// Seat booking and cancellation
    pub engine: Arc<BookingEngine>,

    /// Reservation records, read directly by dashboard views
    pub reservations: Arc<ReservationStore>,

    /// Administrator accounts
    pub admins: Arc<AdminStore>,

    pub verifier: Arc<dyn CredentialVerifier>,

    /// Per-caller admin sessions
    pub sessions: Arc<SessionStore>,

    pub pricing: Arc<PricingMatrix>,

    pub metrics: Arc<Metrics>,

    /// Write-Ahead Log for persistence
    pub wal: Arc<Wal>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, wal: Wal) -> Self {
        let config = Arc::new(config);
        let wal = Arc::new(wal);

        let reservations = Arc::new(ReservationStore::new(Arc::clone(&wal)));
        let admins = Arc::new(AdminStore::new(Arc::clone(&wal)));
        let verifier: Arc<dyn CredentialVerifier> =
            Arc::new(PlaintextVerifier::new(Arc::clone(&admins)));

        Self {
            engine: Arc::new(BookingEngine::new(Arc::clone(&reservations))),
            reservations,
            admins,
            verifier,
            sessions: Arc::new(SessionStore::new(config.admin.session_cookie.clone())),
            pricing: Arc::new(PricingMatrix::new()),
            metrics: Arc::new(Metrics::new()),
            wal,
            config,
        }
    }
}
