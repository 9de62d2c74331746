use crate::engine::pricing::PricingMatrix;
use crate::models::reservation::Reservation;

/// Revenue across the given reservations
///
/// Reservations outside the cabin grid contribute nothing.
pub fn total(reservations: &[Reservation], pricing: &PricingMatrix) -> u64 {
    reservations
        .iter()
        .filter_map(Reservation::seat)
        .map(|seat| u64::from(pricing.price_of_seat(seat)))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reservation_at(row: usize, column: usize) -> Reservation {
        Reservation {
            id: 0,
            passenger_name: "Grace Hopper".to_string(),
            row,
            column,
            e_ticket: "ABCDEF012345".to_string(),
            created: 0,
        }
    }

    #[test]
    fn test_window_seats() {
        let pricing = PricingMatrix::new();
        let reservations = vec![reservation_at(0, 0), reservation_at(5, 3)];
        assert_eq!(total(&reservations, &pricing), 200);
    }

    #[test]
    fn test_single_seats() {
        let pricing = PricingMatrix::new();
        assert_eq!(total(&[reservation_at(0, 1)], &pricing), 75);
        assert_eq!(total(&[reservation_at(0, 2)], &pricing), 50);
    }

    #[test]
    fn test_empty() {
        assert_eq!(total(&[], &PricingMatrix::new()), 0);
    }

    #[test]
    fn test_skips_out_of_bounds() {
        let pricing = PricingMatrix::new();
        let reservations = vec![reservation_at(0, 0), reservation_at(12, 0), reservation_at(3, 9)];
        assert_eq!(total(&reservations, &pricing), 100);
    }

    #[test]
    fn test_full_cabin() {
        use crate::models::reservation::Seat;

        let pricing = PricingMatrix::new();
        let reservations: Vec<Reservation> = Seat::all()
            .map(|seat| reservation_at(seat.row, seat.column))
            .collect();
        assert_eq!(total(&reservations, &pricing), 12 * 325);
    }
}
