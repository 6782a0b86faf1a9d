//! Due-date factor: days elapsed since 1997-10-07.
//!
//! The four-digit field overflowed on 2025-02-22, when the count restarted at
//! 1000. From then on factors cycle through 1000..=9999.

use chrono::{Duration, NaiveDate};

use crate::error::{BoletoError, Result};

/// Base date of the factor count.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1997, 10, 7) {
    Some(date) => date,
    None => panic!("invalid factor epoch"),
};

/// Factor encoded for slips without a due date.
pub const NO_DUE_DATE: &str = "0000";

const FIRST_CYCLE_END: i64 = 9999;
const CYCLE_START: i64 = 1000;
const CYCLE_LEN: i64 = 9000;

/// Four-digit due-date factor for the barcode.
pub fn due_date_factor(due_date: Option<NaiveDate>) -> Result<String> {
    let Some(due_date) = due_date else {
        return Ok(NO_DUE_DATE.to_string());
    };

    let days = (due_date - EPOCH).num_days();
    if days < 0 {
        return Err(BoletoError::validation(
            "due_date",
            format!("{} is before the factor epoch {}", due_date, EPOCH),
        ));
    }

    let factor = if days > FIRST_CYCLE_END {
        (days - FIRST_CYCLE_END - 1) % CYCLE_LEN + CYCLE_START
    } else {
        days
    };

    Ok(format!("{:04}", factor))
}

/// Due date for a factor, picking the cycle closest to `reference`.
///
/// Returns `None` for factor 0 (no due date) and for factors above 9999.
pub fn factor_to_date(factor: u16, reference: NaiveDate) -> Option<NaiveDate> {
    let factor = i64::from(factor);
    if factor == 0 || factor > FIRST_CYCLE_END {
        return None;
    }

    let first = EPOCH + Duration::days(factor);
    if factor < CYCLE_START {
        return Some(first);
    }

    let base = FIRST_CYCLE_END + 1 + (factor - CYCLE_START);
    let offset = (reference - EPOCH).num_days() - base;
    let cycles = ((offset as f64) / (CYCLE_LEN as f64)).round().max(0.0) as i64;
    let later = EPOCH + Duration::days(base + cycles * CYCLE_LEN);

    let distance = |date: NaiveDate| (date - reference).num_days().abs();
    if distance(first) <= distance(later) {
        Some(first)
    } else {
        Some(later)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_factor_known_dates() {
        assert_eq!(due_date_factor(Some(date(2000, 7, 3))).unwrap(), "1000");
        assert_eq!(due_date_factor(Some(date(2008, 2, 1))).unwrap(), "3769");
        assert_eq!(due_date_factor(Some(date(2025, 2, 21))).unwrap(), "9999");
    }

    #[test]
    fn test_factor_rollover() {
        assert_eq!(due_date_factor(Some(date(2025, 2, 22))).unwrap(), "1000");
        assert_eq!(due_date_factor(Some(date(2025, 2, 23))).unwrap(), "1001");
    }

    #[test]
    fn test_factor_without_due_date() {
        assert_eq!(due_date_factor(None).unwrap(), "0000");
    }

    #[test]
    fn test_factor_before_epoch() {
        assert!(matches!(
            due_date_factor(Some(date(1997, 10, 6))),
            Err(BoletoError::Validation { .. })
        ));
    }

    #[test]
    fn test_factor_to_date_picks_nearest_cycle() {
        assert_eq!(factor_to_date(3769, date(2008, 1, 1)), Some(date(2008, 2, 1)));
        assert_eq!(factor_to_date(1000, date(2000, 6, 1)), Some(date(2000, 7, 3)));
        assert_eq!(factor_to_date(1000, date(2025, 3, 1)), Some(date(2025, 2, 22)));
        assert_eq!(factor_to_date(0, date(2025, 3, 1)), None);
    }

    #[test]
    fn test_factor_round_trip_after_rollover() {
        let due = date(2026, 10, 19);
        let factor: u16 = due_date_factor(Some(due)).unwrap().parse().unwrap();
        assert_eq!(factor_to_date(factor, date(2026, 9, 1)), Some(due));
    }
}
