use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::core::config::AdminConfig;
use crate::core::state::AppState;
use crate::models::admin::AdminAccount;
use crate::models::reservation::Reservation;
use crate::wal::wal::WalOperation;

// this runs at boot time
pub fn apply_wal_operations(state: &AppState, operations: &[WalOperation]) -> Result<()> {
    for op in operations {
        match op {
            WalOperation::CreateReservation {
                id,
                row,
                column,
                e_ticket,
                created,
                passenger_name,
            } => {
                state.reservations.restore(Reservation {
                    id: *id,
                    passenger_name: passenger_name.clone(),
                    row: *row,
                    column: *column,
                    e_ticket: e_ticket.clone(),
                    created: *created,
                });
            }
            WalOperation::DeleteReservation { id } => {
                if state.reservations.remove(*id).is_none() {
                    warn!(reservation_id = id, "Replayed delete for unknown reservation");
                }
            }
            WalOperation::AddAdmin { username, password } => {
                state
                    .admins
                    .restore(AdminAccount::new(username.clone(), password.clone()));
            }
        }
    }
    Ok(())
}

/// Create the configured default administrator if none exists
///
/// Storage failures are logged and swallowed; the service still starts.
pub fn bootstrap_admin(state: &AppState, config: &AdminConfig) {
    if !state.admins.is_empty() {
        info!(admins = state.admins.len(), "Administrator accounts loaded");
        return;
    }

    let account = AdminAccount::new(
        config.bootstrap_username.clone(),
        config.bootstrap_password.clone(),
    );

    match state.admins.add(account) {
        Ok(()) => {
            warn!(
                username = %config.bootstrap_username,
                "Default administrator created with well-known credentials; change them"
            );
        }
        Err(e) => {
            error!(error = %e, "Failed to create default administrator");
        }
    }
}

/// Rewrite the WAL so it holds only live records
pub fn compact_wal(state: &AppState) -> Result<usize> {
    let mut snapshot = state.admins.snapshot();
    snapshot.extend(state.reservations.snapshot());

    state
        .wal
        .rewrite(&snapshot)
        .with_context(|| format!("Failed to compact WAL at {}", state.wal.path().display()))?;

    Ok(snapshot.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::wal::wal::Wal;
    use tempfile::TempDir;

    fn create_test_state(dir: &TempDir) -> AppState {
        let wal = Wal::new(dir.path().join("test.wal")).unwrap();
        let config = Config::from_toml("[server]\nport = 5000\n").unwrap();
        AppState::new(config, wal)
    }

    fn create_op(id: u64, row: usize, column: usize) -> WalOperation {
        WalOperation::CreateReservation {
            id,
            row,
            column,
            e_ticket: format!("TICKET{:06}", id),
            created: 1_700_000_000,
            passenger_name: format!("Passenger {}", id),
        }
    }

    #[test]
    fn test_apply_wal_operations() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir);

        let operations = vec![
            WalOperation::AddAdmin {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            },
            create_op(1, 0, 0),
            create_op(2, 5, 3),
            WalOperation::DeleteReservation { id: 1 },
            create_op(3, 0, 0),
        ];
        apply_wal_operations(&state, &operations).unwrap();

        assert_eq!(state.admins.len(), 1);
        let ids: Vec<u64> = state.reservations.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(state.reservations.find_by_seat(0, 0).unwrap().id, 3);
    }

    #[test]
    fn test_bootstrap_creates_default_admin_once() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir);
        let config = AdminConfig::default();

        bootstrap_admin(&state, &config);
        bootstrap_admin(&state, &config);

        assert_eq!(state.admins.len(), 1);
        assert!(state.verifier.verify("admin", "admin123"));
        assert_eq!(state.wal.replay().unwrap().len(), 1);
    }

    #[test]
    fn test_bootstrap_skipped_when_admin_exists() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir);
        state.admins.restore(AdminAccount::new("ops", "pw"));

        bootstrap_admin(&state, &AdminConfig::default());

        assert_eq!(state.admins.len(), 1);
        assert!(!state.verifier.verify("admin", "admin123"));
    }

    #[test]
    fn test_state_survives_restart() {
        let dir = TempDir::new().unwrap();

        {
            let state = create_test_state(&dir);
            bootstrap_admin(&state, &AdminConfig::default());
            let kept = state.engine.reserve_seat("Ada", "Lovelace", 1, 1).unwrap();
            let dropped = state.engine.reserve_seat("Grace", "Hopper", 2, 2).unwrap();
            state.engine.cancel(dropped.id).unwrap();
            assert_eq!(kept.id, 1);
        }

        let state = create_test_state(&dir);
        let operations = state.wal.replay().unwrap();
        apply_wal_operations(&state, &operations).unwrap();

        assert!(state.verifier.verify("admin", "admin123"));
        let reservations = state.reservations.list();
        assert_eq!(reservations.len(), 1);
        assert_eq!(reservations[0].passenger_name, "Ada Lovelace");
        assert!(state.reservations.find_by_seat(2, 2).is_none());

        let next = state.engine.reserve_seat("Alan", "Turing", 3, 3).unwrap();
        assert_eq!(next.id, 3);
    }

    #[test]
    fn test_booking_after_crash_survives_restart() {
        let dir = TempDir::new().unwrap();
        let admin = WalOperation::AddAdmin {
            username: "admin".to_string(),
            password: "admin123".to_string(),
        };
        let seeded = format!(
            "ADD_ADMIN|{}|{}\nCREATE_RESERVATION|9|0|0|AB",
            hex::encode("admin"),
            hex::encode("admin123")
        );
        std::fs::write(dir.path().join("test.wal"), seeded).unwrap();

        // No compaction between restarts
        let booked = {
            let state = create_test_state(&dir);
            let operations = state.wal.replay().unwrap();
            assert_eq!(operations, vec![admin]);
            apply_wal_operations(&state, &operations).unwrap();
            state.engine.reserve_seat("Ada", "Lovelace", 3, 3).unwrap()
        };

        let state = create_test_state(&dir);
        let operations = state.wal.replay().unwrap();
        apply_wal_operations(&state, &operations).unwrap();

        let found = state.reservations.find_by_seat(3, 3).unwrap();
        assert_eq!(found.id, booked.id);
        assert_eq!(found.e_ticket, booked.e_ticket);
        assert!(matches!(
            state.engine.reserve_seat("Grace", "Hopper", 3, 3),
            Err(crate::core::error::ReservationError::SeatTaken { .. })
        ));
    }

    #[test]
    fn test_compact_wal() {
        let dir = TempDir::new().unwrap();
        let state = create_test_state(&dir);
        bootstrap_admin(&state, &AdminConfig::default());

        let first = state.engine.reserve_seat("Ada", "Lovelace", 0, 0).unwrap();
        state.engine.reserve_seat("Grace", "Hopper", 0, 1).unwrap();
        state.engine.cancel(first.id).unwrap();
        assert_eq!(state.wal.replay().unwrap().len(), 4);

        let written = compact_wal(&state).unwrap();
        assert_eq!(written, 2);

        let operations = state.wal.replay().unwrap();
        assert_eq!(operations.len(), 2);
        assert!(matches!(operations[0], WalOperation::AddAdmin { .. }));
        assert!(matches!(operations[1], WalOperation::CreateReservation { id: 2, .. }));
    }
}
