//! Birthday dates: month and day with an optional birth year.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Leap year used to validate dates whose year is unknown, so that 29-02 is accepted.
pub const REFERENCE_LEAP_YEAR: i32 = 2000;

/// Largest year that still fits the canonical 4-digit form.
const MAX_YEAR: u32 = 9999;

/// A birthday: month and day, plus the birth year when known.
///
/// Stored and serialized in canonical `YYYY-MM-DD` form, with `0000` as the
/// year when it is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BirthdayDate {
    /// 0 means unknown
    year: u32,
    month: u32,
    day: u32,
}

impl BirthdayDate {
    /// Build a date, validating day and month.
    ///
    /// With a known year the date must exist in that year; otherwise it is
    /// checked against [`REFERENCE_LEAP_YEAR`].
    pub fn new(year: Option<u32>, month: u32, day: u32) -> Result<Self, ValidationError> {
        let year = year.unwrap_or(0);
        let invalid = || ValidationError::InvalidDateFormat(format!("{day}-{month}-{year}"));

        if year > MAX_YEAR {
            return Err(invalid());
        }
        let check_year = if year == 0 {
            REFERENCE_LEAP_YEAR
        } else {
            year as i32
        };
        NaiveDate::from_ymd_opt(check_year, month, day).ok_or_else(invalid)?;

        Ok(Self { year, month, day })
    }

    /// Parse user input in `D-M` or `D-M-Y` form. A year of 0 means unknown.
    pub fn parse_input(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDateFormat(input.to_string());
        let parts: Vec<u32> = input
            .trim()
            .split('-')
            .map(|p| p.trim().parse::<u32>())
            .collect::<Result<_, _>>()
            .map_err(|_| invalid())?;

        match parts.as_slice() {
            [day, month] => Self::new(None, *month, *day).map_err(|_| invalid()),
            [day, month, year] => Self::new(Some(*year), *month, *day).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// Parse the canonical `YYYY-MM-DD` storage form.
    pub fn parse_stored(stored: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDateFormat(stored.to_string());
        let parts: Vec<&str> = stored.split('-').collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(invalid());
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(invalid());
        }

        let year: u32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let day: u32 = day.parse().map_err(|_| invalid())?;
        Self::new(Some(year), month, day).map_err(|_| invalid())
    }

    /// Birth year, if known.
    pub fn year(&self) -> Option<i32> {
        (self.year != 0).then_some(self.year as i32)
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Human-facing `DD-MM` or `DD-MM-YYYY` rendering.
    pub fn to_display(&self) -> String {
        match self.year() {
            Some(year) => format!("{:02}-{:02}-{:04}", self.day, self.month, year),
            None => format!("{:02}-{:02}", self.day, self.month),
        }
    }
}

impl fmt::Display for BirthdayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for BirthdayDate {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_stored(s)
    }
}

impl TryFrom<String> for BirthdayDate {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse_stored(&s)
    }
}

impl From<BirthdayDate> for String {
    fn from(date: BirthdayDate) -> Self {
        date.to_string()
    }
}
