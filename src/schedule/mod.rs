//! Frequency → reminder-schedule translation, plus the polling reminder
//! service that fires due reminders.

pub mod service;
pub mod times;

pub use service::{
    ActiveReminderStore, ReminderAlert, ReminderService, ReminderSource, ScheduledReminder,
};
pub use times::{
    doses_per_day, expected_doses, expected_doses_between, next_dose, parse_clock, times_for,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid clock time (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("reminder source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("reminder store lock poisoned")]
    LockFailed,
}
