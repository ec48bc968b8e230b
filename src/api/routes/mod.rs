pub mod birthdays;
pub mod calendar;
pub mod sensors;
pub mod settings;
