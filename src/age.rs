//! Patient age from a recorded birth date.
//!
//! Ages of one year and above are whole completed years. Below one year the
//! value is a fraction of a year built from calendar months plus a day
//! correction of `(reference_day - birth_day) / 30`. The 30-day month is an
//! accepted approximation, not calendar-exact.

use chrono::{DateTime, Datelike, NaiveDate};

/// Computes age in years at `reference`.
///
/// `None` when the birth date is unrecorded or lies after `reference`.
pub fn compute_age(birth_date: Option<NaiveDate>, reference: NaiveDate) -> Option<f64> {
    let birth = birth_date?;
    if birth > reference {
        return None;
    }

    let span = reference.year() - birth.year();
    let anchored = anchor_on_year(birth, reference.year());
    let years = if anchored <= reference { span } else { span - 1 };

    if years >= 1 {
        return Some(f64::from(years));
    }

    let months = (reference.year() - birth.year()) * 12
        + reference.month() as i32
        - birth.month() as i32;
    let day_correction = (reference.day() as f64 - birth.day() as f64) / 30.0;
    Some((f64::from(months) + day_correction) / 12.0)
}

/// Parses a stored birth date (`YYYY-MM-DD` or RFC 3339) and computes the age.
/// Unparseable input yields `None`.
pub fn compute_age_from_str(birth_date: Option<&str>, reference: NaiveDate) -> Option<f64> {
    compute_age(birth_date.and_then(parse_birth_date), reference)
}

/// Accepts the two formats birth dates arrive in from the UI.
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// Whole years suitable for display; `None` under one year.
pub fn displayable_years(age: Option<f64>) -> Option<u32> {
    match age {
        Some(a) if a >= 1.0 => Some(a.floor() as u32),
        _ => None,
    }
}

/// Moves the birthday onto `year`. Feb 29 falls back to Feb 28 in common years.
fn anchor_on_year(birth: NaiveDate, year: i32) -> NaiveDate {
    birth
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, birth.month(), 28))
        .unwrap_or(birth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn birthday_not_yet_reached_this_year() {
        let age = compute_age(Some(d(2000, 3, 15)), d(2024, 3, 10));
        assert_eq!(age, Some(23.0));
    }

    #[test]
    fn birthday_already_passed_this_year() {
        let age = compute_age(Some(d(2000, 3, 15)), d(2024, 3, 20));
        assert_eq!(age, Some(24.0));
    }

    #[test]
    fn birthday_today_counts_as_reached() {
        let age = compute_age(Some(d(1990, 7, 1)), d(2025, 7, 1));
        assert_eq!(age, Some(35.0));
    }

    #[test]
    fn whole_years_for_many_spans() {
        let today = d(2026, 10, 19);
        for n in 2..90 {
            let passed = d(2026 - n, 1, 5);
            assert_eq!(compute_age(Some(passed), today), Some(f64::from(n)));

            let upcoming = d(2026 - n, 12, 5);
            assert_eq!(compute_age(Some(upcoming), today), Some(f64::from(n - 1)));
        }
    }

    #[test]
    fn six_months_old_is_fractional() {
        let age = compute_age(Some(d(2024, 3, 10)), d(2024, 9, 10)).unwrap();
        assert!(age > 0.0 && age < 1.0, "got {age}");
        assert!((age - 0.5).abs() < 1e-9);
    }

    #[test]
    fn six_months_across_new_year_is_fractional() {
        let age = compute_age(Some(d(2023, 9, 10)), d(2024, 3, 10)).unwrap();
        assert!(age > 0.0 && age < 1.0, "got {age}");
    }

    #[test]
    fn day_correction_uses_thirty_day_months() {
        // 2 calendar months, minus 10 days
        let age = compute_age(Some(d(2024, 1, 20)), d(2024, 3, 10)).unwrap();
        let expected = (2.0 - 10.0 / 30.0) / 12.0;
        assert!((age - expected).abs() < 1e-9);
    }

    #[test]
    fn newborn_is_zero() {
        assert_eq!(compute_age(Some(d(2024, 5, 1)), d(2024, 5, 1)), Some(0.0));
    }

    #[test]
    fn leap_day_birthday_in_common_year() {
        // Anchored to Feb 28
        assert_eq!(compute_age(Some(d(2000, 2, 29)), d(2023, 2, 28)), Some(23.0));
        assert_eq!(compute_age(Some(d(2000, 2, 29)), d(2023, 2, 27)), Some(22.0));
    }

    #[test]
    fn missing_birth_date_is_none() {
        assert_eq!(compute_age(None, d(2024, 1, 1)), None);
    }

    #[test]
    fn future_birth_date_is_none() {
        assert_eq!(compute_age(Some(d(2030, 1, 1)), d(2024, 1, 1)), None);
    }

    #[test]
    fn parses_plain_and_rfc3339_dates() {
        assert_eq!(parse_birth_date("2000-03-15"), Some(d(2000, 3, 15)));
        assert_eq!(
            parse_birth_date("2000-03-15T00:00:00.000Z"),
            Some(d(2000, 3, 15))
        );
        assert_eq!(parse_birth_date("15/03/2000"), None);
        assert_eq!(parse_birth_date("  "), None);
    }

    #[test]
    fn unparseable_string_is_none() {
        assert_eq!(compute_age_from_str(Some("not a date"), d(2024, 1, 1)), None);
        assert_eq!(compute_age_from_str(None, d(2024, 1, 1)), None);
        assert_eq!(
            compute_age_from_str(Some("2000-03-15"), d(2024, 3, 20)),
            Some(24.0)
        );
    }

    #[test]
    fn displayable_only_from_one_year() {
        assert_eq!(displayable_years(Some(0.5)), None);
        assert_eq!(displayable_years(Some(0.99)), None);
        assert_eq!(displayable_years(Some(1.0)), Some(1));
        assert_eq!(displayable_years(Some(42.0)), Some(42));
        assert_eq!(displayable_years(None), None);
    }
}
