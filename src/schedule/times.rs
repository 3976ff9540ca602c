//! Deterministic frequency-label → clock-time translation.
//!
//! Pure and cheap by design: the reminder service recomputes these on
//! every tick rather than caching, which keeps the firing logic
//! idempotent. Every list returned is ascending and duplicate-free.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::config;

use super::ScheduleError;

/// Fixed slot times for morning/afternoon/night-qualified labels.
const MORNING: &str = "08:00";
const AFTERNOON: &str = "14:00";
const NIGHT: &str = "20:00";

/// Reminder clock times for a canonical frequency label.
///
/// Slot-qualified labels map to exactly the slots they mention;
/// unqualified counts and every-N-hour labels map to fixed grids;
/// as-needed medication gets no scheduled reminders at all. Unrecognized
/// labels fall back to a single default time — the mapping is total.
pub fn times_for(frequency_label: &str) -> Vec<String> {
    let label = frequency_label.to_lowercase();

    // As-needed medication is taken on symptoms, not on a clock.
    if label.contains("as needed") || label.contains("sos") || label.contains("prn") {
        return Vec::new();
    }

    let mut slots: Vec<&str> = Vec::new();
    if label.contains("morning") {
        slots.push(MORNING);
    }
    if label.contains("afternoon") {
        slots.push(AFTERNOON);
    }
    if label.contains("night") {
        slots.push(NIGHT);
    }
    if !slots.is_empty() {
        return slots.into_iter().map(String::from).collect();
    }

    if label.contains("bedtime") || label.contains("before sleep") {
        return vec!["21:00".into()];
    }
    if label.contains("before meals") || label.contains("after meals") {
        return vec![MORNING.into(), AFTERNOON.into(), NIGHT.into()];
    }

    if label.contains("every 6 hours") || label.contains("q6h") {
        return ["00:00", "06:00", "12:00", "18:00"].map(String::from).to_vec();
    }
    if label.contains("every 8 hours") || label.contains("q8h") {
        return ["00:00", "08:00", "16:00"].map(String::from).to_vec();
    }
    if label.contains("every 12 hours") || label.contains("q12h") {
        return ["08:00", "20:00"].map(String::from).to_vec();
    }
    if label.contains("tds") {
        return ["08:00", "14:00", "20:00"].map(String::from).to_vec();
    }

    if label.contains("four times daily") || label.contains("qid") {
        return ["08:00", "12:00", "16:00", "20:00"].map(String::from).to_vec();
    }
    if label.contains("three times daily") || label.contains("tid") {
        return ["08:00", "14:00", "20:00"].map(String::from).to_vec();
    }
    if label.contains("twice daily") || label.contains("bid") {
        return ["09:00", "21:00"].map(String::from).to_vec();
    }
    if label.contains("daily") {
        return vec!["09:00".into()];
    }

    vec![config::DEFAULT_REMINDER_TIME.into()]
}

/// Interval between doses implied by a frequency label. Default 24h.
fn dose_interval(frequency_label: &str) -> Duration {
    let label = frequency_label.to_lowercase();

    if label.contains("four times daily")
        || label.contains("qid")
        || label.contains("every 6 hours")
        || label.contains("q6h")
    {
        Duration::hours(6)
    } else if label.contains("three times daily")
        || label.contains("tid")
        || label.contains("every 8 hours")
        || label.contains("q8h")
    {
        Duration::hours(8)
    } else if label.contains("twice daily")
        || label.contains("bid")
        || label.contains("every 12 hours")
        || label.contains("q12h")
    {
        Duration::hours(12)
    } else {
        Duration::hours(24)
    }
}

/// When the next dose is due, given when the last one was taken.
pub fn next_dose(last_taken: DateTime<Utc>, frequency_label: &str) -> DateTime<Utc> {
    last_taken + dose_interval(frequency_label)
}

/// Doses per day implied by a frequency label (1, 2, 3 or 4).
pub fn doses_per_day(frequency_label: &str) -> i64 {
    24 / dose_interval(frequency_label).num_hours()
}

/// Expected dose count between `since` and `now`: whole days elapsed
/// times doses per day. Used for compliance statistics.
pub fn expected_doses_between(
    frequency_label: &str,
    since: DateTime<Utc>,
    now: DateTime<Utc>,
) -> i64 {
    let days = (now - since).num_days().max(0);
    days * doses_per_day(frequency_label)
}

/// As [`expected_doses_between`], measured up to the current instant.
pub fn expected_doses(frequency_label: &str, since: DateTime<Utc>) -> i64 {
    expected_doses_between(frequency_label, since, Utc::now())
}

/// Parse an `HH:MM` clock string (custom reminder times arrive as text).
pub fn parse_clock(time: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| ScheduleError::InvalidTime(time.to_string()))
}
