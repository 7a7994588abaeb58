//! Raffle rules: how much weight buys a ticket, how tickets are numbered and
//! how the winning position is picked.

use crate::error::{AppError, AppResult};
use rand::Rng;

/// Prefix printed on every physical receipt. Must not change.
pub const TICKET_CODE_PREFIX: &str = "RF";

/// Largest number of tickets a single donation may mint (10 tonnes).
/// Issuance keeps every minted code in memory until the transaction commits.
pub const MAX_TICKETS_PER_DONATION: i64 = 10_000;

/// Number of tickets a donation earns: one per whole kilogram.
///
/// Fractions below 1 kg are dropped. Donations under 1 kg, above
/// [`MAX_TICKETS_PER_DONATION`] kg, or weights that are not finite numbers
/// are rejected.
pub fn tickets_for_weight(weight_kg: f64) -> AppResult<i64> {
    if !weight_kg.is_finite() {
        return Err(AppError::InvalidWeight(
            "Weight must be a finite number".to_string(),
        ));
    }
    let whole = weight_kg.floor();
    if whole < 1.0 {
        return Err(AppError::InvalidWeight(
            "Minimum donation to earn a ticket is 1 kg".to_string(),
        ));
    }
    if whole > MAX_TICKETS_PER_DONATION as f64 {
        return Err(AppError::InvalidWeight(format!(
            "A single donation may not exceed {MAX_TICKETS_PER_DONATION} kg"
        )));
    }
    Ok(whole as i64)
}

/// Ticket code for a serial within a campaign year, e.g. `RF-2024-000025`.
///
/// The serial is zero-padded to six digits and widens past 999999 instead of
/// being truncated, so distinct (year, serial) pairs never collide.
pub fn format_ticket_code(year: i64, serial: i64) -> AppResult<String> {
    if year < 0 || serial < 0 {
        return Err(AppError::InvalidCodeParameters(format!(
            "Year and serial must be non-negative (year={year}, serial={serial})"
        )));
    }
    Ok(format!("{TICKET_CODE_PREFIX}-{year}-{serial:06}"))
}

/// Uniformly random offset in `[0, total)`.
pub fn pick_ticket_offset<R: Rng>(rng: &mut R, total: u64) -> AppResult<u64> {
    if total == 0 {
        return Err(AppError::InternalError(
            "Cannot pick from an empty ticket pool".to_string(),
        ));
    }
    Ok(rng.gen_range(0..total))
}

/// Same as [`pick_ticket_offset`] with the thread-local generator.
///
/// Kept synchronous so the generator never lives across an `.await`.
pub fn random_ticket_offset(total: u64) -> AppResult<u64> {
    let mut rng = rand::thread_rng();
    pick_ticket_offset(&mut rng, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn test_tickets_for_weight_floors() {
        assert_eq!(tickets_for_weight(1.0).unwrap(), 1);
        assert_eq!(tickets_for_weight(1.9).unwrap(), 1);
        assert_eq!(tickets_for_weight(3.7).unwrap(), 3);
        assert_eq!(tickets_for_weight(12.0).unwrap(), 12);
    }

    #[test]
    fn test_tickets_for_weight_rejects_below_one_kg() {
        for w in [0.0, 0.5, 0.99, -1.0, -10.5] {
            let err = tickets_for_weight(w).unwrap_err();
            assert!(matches!(err, AppError::InvalidWeight(_)), "weight {w}");
        }
    }

    #[test]
    fn test_tickets_for_weight_rejects_non_finite() {
        for w in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                tickets_for_weight(w),
                Err(AppError::InvalidWeight(_))
            ));
        }
    }

    #[test]
    fn test_tickets_for_weight_caps_single_donation() {
        let max = MAX_TICKETS_PER_DONATION as f64;
        assert_eq!(tickets_for_weight(max).unwrap(), MAX_TICKETS_PER_DONATION);
        assert_eq!(tickets_for_weight(max + 0.9).unwrap(), MAX_TICKETS_PER_DONATION);
        for w in [max + 1.0, 1e15, f64::MAX] {
            assert!(
                matches!(tickets_for_weight(w), Err(AppError::InvalidWeight(_))),
                "weight {w}"
            );
        }
    }

    #[test]
    fn test_format_ticket_code() {
        assert_eq!(format_ticket_code(2024, 1).unwrap(), "RF-2024-000001");
        assert_eq!(format_ticket_code(2024, 25).unwrap(), "RF-2024-000025");
        assert_eq!(format_ticket_code(2025, 999_999).unwrap(), "RF-2025-999999");
    }

    #[test]
    fn test_format_ticket_code_widens_past_six_digits() {
        assert_eq!(format_ticket_code(2024, 1_000_000).unwrap(), "RF-2024-1000000");
    }

    #[test]
    fn test_format_ticket_code_rejects_negative() {
        assert!(matches!(
            format_ticket_code(-1, 1),
            Err(AppError::InvalidCodeParameters(_))
        ));
        assert!(matches!(
            format_ticket_code(2024, -5),
            Err(AppError::InvalidCodeParameters(_))
        ));
    }

    #[test]
    fn test_fifty_consecutive_codes_are_distinct() {
        let codes: HashSet<String> = (1..=50)
            .map(|s| format_ticket_code(2024, s).unwrap())
            .collect();
        assert_eq!(codes.len(), 50);
    }

    #[test]
    fn test_pick_ticket_offset_empty_pool() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(pick_ticket_offset(&mut rng, 0).is_err());
    }

    #[test]
    fn test_pick_ticket_offset_is_uniform() {
        let mut rng = StdRng::seed_from_u64(20240601);
        let total = 10u64;
        let draws = 100_000;
        let mut hits = vec![0u32; total as usize];
        for _ in 0..draws {
            let r = pick_ticket_offset(&mut rng, total).unwrap();
            hits[r as usize] += 1;
        }
        let expected = draws as f64 / total as f64;
        for (i, h) in hits.iter().enumerate() {
            let deviation = (*h as f64 - expected).abs() / expected;
            assert!(deviation < 0.05, "offset {i} drawn {h} times");
        }
    }

    proptest! {
        #[test]
        fn prop_tickets_equal_floor(w in 1.0f64..10_000.0) {
            prop_assert_eq!(tickets_for_weight(w).unwrap(), w.floor() as i64);
        }

        #[test]
        fn prop_fractional_weights_rejected(w in 0.0f64..1.0) {
            prop_assert!(tickets_for_weight(w).is_err());
        }

        #[test]
        fn prop_codes_sort_in_serial_order(year in 2000i64..2100, a in 0i64..999_999, b in 0i64..999_999) {
            let ca = format_ticket_code(year, a).unwrap();
            let cb = format_ticket_code(year, b).unwrap();
            prop_assert_eq!(a.cmp(&b), ca.cmp(&cb));
        }

        #[test]
        fn prop_offset_in_range(seed in any::<u64>(), total in 1u64..10_000) {
            let mut rng = StdRng::seed_from_u64(seed);
            let r = pick_ticket_offset(&mut rng, total).unwrap();
            prop_assert!(r < total);
        }
    }
}
