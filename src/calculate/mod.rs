//! Date math for birthdays.
//!
//! Pure functions over a [`BirthdayDate`] and a reference day:
//! - Normalizing user input to the canonical storage form
//! - Projecting a birthday onto a concrete year (Feb-29 falls back to Feb-28)
//! - Days until the next occurrence and the age reached on it
//! - English ordinal formatting

use chrono::{Datelike, NaiveDate};

use crate::models::{BirthdayDate, ValidationError};

/// Normalize `D-M` / `D-M-Y` input to canonical `YYYY-MM-DD`.
pub fn normalize_date(input: &str) -> Result<String, ValidationError> {
    BirthdayDate::parse_input(input).map(|d| d.to_string())
}

/// Convert canonical `YYYY-MM-DD` to the display form `DD-MM[-YYYY]`.
pub fn display_date(stored: &str) -> Result<String, ValidationError> {
    BirthdayDate::parse_stored(stored).map(|d| d.to_display())
}

/// The date a birthday falls on in `year`.
///
/// A Feb-29 birthday is observed on Feb-28 in non-leap years.
pub fn occurrence_in_year(date: &BirthdayDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        // only reachable for years outside chrono's range
        .unwrap_or(NaiveDate::MAX)
}

/// This year's occurrence, or next year's if this year's is already past.
pub fn next_occurrence(date: &BirthdayDate, today: NaiveDate) -> NaiveDate {
    let this_year = occurrence_in_year(date, today.year());
    if this_year < today {
        occurrence_in_year(date, today.year() + 1)
    } else {
        this_year
    }
}

/// Days until the next occurrence; 0 means today. Always within `0..=365`.
pub fn days_until(date: &BirthdayDate, today: NaiveDate) -> u32 {
    let days = (next_occurrence(date, today) - today).num_days();
    u32::try_from(days).unwrap_or(0)
}

/// Age reached at the next occurrence, or `None` when the birth year is unknown.
pub fn age_turning(date: &BirthdayDate, today: NaiveDate) -> Option<i32> {
    let birth_year = date.year()?;
    let this_year = occurrence_in_year(date, today.year());
    if this_year < today {
        Some(today.year() + 1 - birth_year)
    } else {
        Some(today.year() - birth_year)
    }
}

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st, 112th...
pub fn ordinal(n: u32) -> String {
    let suffix = if (11..=13).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}

/// Ordinal for an age; none for ages that are zero or negative.
pub fn ordinal_for_age(age: i32) -> Option<String> {
    u32::try_from(age).ok().filter(|a| *a > 0).map(ordinal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bday(input: &str) -> BirthdayDate {
        BirthdayDate::parse_input(input).unwrap()
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("5-3").unwrap(), "0000-03-05");
        assert_eq!(normalize_date("05-03-1999").unwrap(), "1999-03-05");
        assert_eq!(normalize_date("5-3-0").unwrap(), "0000-03-05");
        assert!(normalize_date("5").is_err());
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("0000-03-05").unwrap(), "05-03");
        assert_eq!(display_date("1999-03-05").unwrap(), "05-03-1999");
    }

    #[test]
    fn test_normalize_display_round_trip() {
        for input in ["1-1", "29-02", "31-12-1970", "7-7-0", "15-06-2024", "29-2-2000"] {
            let normalized = normalize_date(input).unwrap();
            let displayed = display_date(&normalized).unwrap();
            assert_eq!(normalize_date(&displayed).unwrap(), normalized, "{input}");
        }
    }

    #[test]
    fn test_days_until_today_is_zero() {
        assert_eq!(days_until(&bday("10-06"), ymd(2025, 6, 10)), 0);
    }

    #[test]
    fn test_days_until_later_this_year() {
        assert_eq!(days_until(&bday("20-06"), ymd(2025, 6, 10)), 10);
    }

    #[test]
    fn test_days_until_wraps_to_next_year() {
        // 2025-06-10 -> 2026-06-09
        assert_eq!(days_until(&bday("09-06"), ymd(2025, 6, 10)), 364);
    }

    #[test]
    fn test_days_until_always_in_range() {
        let dates = ["1-1", "31-12", "29-02", "28-02", "1-3", "15-7-1990"];
        let mut today = ymd(2023, 1, 1);
        while today < ymd(2025, 1, 2) {
            for d in dates {
                let days = days_until(&bday(d), today);
                assert!(days <= 365, "{d} on {today}: {days}");
            }
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_leap_day_fallback_before_reference() {
        // 2023-02-28 fallback is already past on 2023-03-01, so next year's 29th applies
        let leap = bday("29-02");
        assert_eq!(occurrence_in_year(&leap, 2023), ymd(2023, 2, 28));
        assert_eq!(next_occurrence(&leap, ymd(2023, 3, 1)), ymd(2024, 2, 29));
        assert_eq!(days_until(&leap, ymd(2023, 3, 1)), 365);
    }

    #[test]
    fn test_leap_day_fallback_ahead_of_reference() {
        let leap = bday("29-02");
        assert_eq!(next_occurrence(&leap, ymd(2023, 2, 1)), ymd(2023, 2, 28));
        assert_eq!(days_until(&leap, ymd(2023, 2, 1)), 27);
        assert_eq!(days_until(&leap, ymd(2023, 2, 28)), 0);
    }

    #[test]
    fn test_leap_day_in_leap_year() {
        let leap = bday("29-02");
        assert_eq!(next_occurrence(&leap, ymd(2024, 2, 1)), ymd(2024, 2, 29));
        // next year is not a leap year
        assert_eq!(next_occurrence(&leap, ymd(2024, 3, 1)), ymd(2025, 2, 28));
    }

    #[test]
    fn test_age_turning_unknown_year() {
        assert_eq!(age_turning(&bday("15-06"), ymd(2025, 1, 1)), None);
    }

    #[test]
    fn test_age_turning_increments_across_boundary() {
        let date = bday("15-06-1985");
        let on_day = age_turning(&date, ymd(2025, 6, 15)).unwrap();
        let day_after = age_turning(&date, ymd(2025, 6, 16)).unwrap();

        assert_eq!(on_day, 40);
        assert_eq!(day_after, on_day + 1);
    }

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(102), "102nd");
        assert_eq!(ordinal(111), "111th");
    }

    #[test]
    fn test_ordinal_for_age() {
        assert_eq!(ordinal_for_age(40).as_deref(), Some("40th"));
        assert_eq!(ordinal_for_age(0), None);
        assert_eq!(ordinal_for_age(-3), None);
    }
}
