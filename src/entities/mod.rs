//! Presentation adapters over the birthday collection.
//!
//! - **calendar**: birthdays as yearly all-day events
//! - **sensor**: one days-until sensor per person

pub mod calendar;
pub mod sensor;

pub use calendar::{events_between, next_event, CalendarEvent};
pub use sensor::{BirthdaySensor, SensorRegistry, SensorState};
