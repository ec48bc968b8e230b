//! Calendar view: birthdays as yearly all-day events.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::calculate::{days_until, next_occurrence, occurrence_in_year, ordinal_for_age};
use crate::models::BirthdayRecord;

/// Display name of the calendar.
pub const CALENDAR_NAME: &str = "Birthdays";

/// Unique ID of the calendar entity.
pub const CALENDAR_UNIQUE_ID: &str = "birthday_tracker_calendar";

/// A single all-day birthday event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub start: NaiveDate,
    /// Exclusive end (day after `start`)
    pub end: NaiveDate,
    pub summary: String,
    pub description: String,
    pub uid: String,
}

impl CalendarEvent {
    fn for_record(record: &BirthdayRecord, date: NaiveDate, uid: String) -> Self {
        Self {
            start: date,
            end: date + Duration::days(1),
            summary: event_summary(record, date),
            description: record.notes.clone(),
            uid,
        }
    }
}

/// Event summary, with the age ordinal when the birth year is known.
///
/// `"Alice's Birthday (40th)"`, `"Bob Jones' Birthday"`.
pub fn event_summary(record: &BirthdayRecord, event_date: NaiveDate) -> String {
    let name = &record.name;
    let possessive = if name.ends_with('s') {
        format!("{}'", name)
    } else {
        format!("{}'s", name)
    };

    let ordinal = record
        .date
        .year()
        .and_then(|birth_year| ordinal_for_age(event_date.year() - birth_year));

    match ordinal {
        Some(ordinal) => format!("{} Birthday ({})", possessive, ordinal),
        None => format!("{} Birthday", possessive),
    }
}

/// The soonest upcoming birthday. Ties go to the earliest-inserted record.
pub fn next_event(records: &[BirthdayRecord], today: NaiveDate) -> Option<CalendarEvent> {
    let closest = records
        .iter()
        .min_by_key(|r| days_until(&r.date, today))?;
    let date = next_occurrence(&closest.date, today);
    Some(CalendarEvent::for_record(closest, date, closest.id.to_string()))
}

/// Every occurrence in `[start, end)`, ordered by date.
pub fn events_between(
    records: &[BirthdayRecord],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = records
        .iter()
        .flat_map(|record| {
            (start.year()..=end.year()).filter_map(move |year| {
                let date = occurrence_in_year(&record.date, year);
                (start <= date && date < end).then(|| {
                    CalendarEvent::for_record(record, date, format!("{}_{}", record.id, year))
                })
            })
        })
        .collect();

    events.sort_by_key(|e| e.start);
    events
}
