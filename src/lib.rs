//! # Birthday Tracker
//!
//! Tracks birthdays, computes upcoming dates and ages, and raises reminders on
//! a daily schedule.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (records, dates, reminder sets)
//! - **calculate**: Date math (normalization, days-until, age, ordinals)
//! - **storage**: Versioned JSON document persistence
//! - **service**: CRUD and the reminder check over the in-memory store
//! - **notify**: Observer registration and reminder delivery
//! - **scheduler**: Cancellable daily reminder schedule
//! - **entities**: Calendar and sensor views
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod entities;
pub mod models;
pub mod notify;
pub mod scheduler;
pub mod service;
pub mod storage;

pub use models::*;
