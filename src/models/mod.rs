//! Core data models for the birthday tracker.

mod birthday;
mod birthday_date;
mod ids;
mod notification_time;
mod reminder_days;
mod validation;

pub use birthday::*;
pub use birthday_date::*;
pub use ids::*;
pub use notification_time::*;
pub use reminder_days::*;
pub use validation::*;
