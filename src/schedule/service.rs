//! Reminder service: a single periodic checker that fires due reminders.
//!
//! The pending-alert store is explicit, bounded and injectable so the
//! service lifecycle is testable in isolation. Delivery (WebSocket, push,
//! database writes) stays outside this crate: callers drain the store.
//! The due/dedupe logic is a pure function over the schedule and the
//! fired log, recomputed on every tick.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ScheduleError;

/// How often the service re-checks for due reminders.
const CHECK_INTERVAL_SECS: u64 = 30;

/// Sleep granularity for shutdown responsiveness.
const SLEEP_GRANULARITY_SECS: u64 = 1;

/// A reminder is due when now is within this many minutes of its time.
const DUE_TOLERANCE_MINS: i64 = 1;

/// Pending alerts kept per user; oldest are evicted first.
const MAX_ALERTS_PER_USER: usize = 32;

/// One reminder row the caller schedules: a clock time for a medication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledReminder {
    pub user_id: Uuid,
    pub medication_id: Uuid,
    pub medication_name: String,
    pub dosage: String,
    pub time: NaiveTime,
}

/// Alert produced when a reminder fires, pending pickup by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderAlert {
    pub user_id: Uuid,
    pub medication_id: Uuid,
    pub medication_name: String,
    pub dosage: String,
    pub time: NaiveTime,
    pub fired_at: DateTime<Utc>,
}

/// Source of scheduled reminders, injected by the caller (typically
/// backed by the persistence layer). Polled on every tick, so it must be
/// cheap; a failing source is logged and retried on the next tick.
pub trait ReminderSource: Send + Sync {
    fn scheduled(&self) -> Result<Vec<ScheduledReminder>, ScheduleError>;
}

/// Bounded in-memory store of pending alerts, keyed by user.
pub struct ActiveReminderStore {
    pending: RwLock<HashMap<Uuid, Vec<ReminderAlert>>>,
}

impl ActiveReminderStore {
    pub fn new() -> Self {
        Self {
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Append an alert for its user, evicting the oldest beyond the
    /// per-user cap.
    pub fn push(&self, alert: ReminderAlert) -> Result<(), ScheduleError> {
        let mut pending = self.pending.write().map_err(|_| ScheduleError::LockFailed)?;
        let alerts = pending.entry(alert.user_id).or_default();
        alerts.push(alert);
        if alerts.len() > MAX_ALERTS_PER_USER {
            let dropped = alerts.len() - MAX_ALERTS_PER_USER;
            alerts.drain(..dropped);
            tracing::warn!(dropped, "reminder store over capacity, evicted oldest");
        }
        Ok(())
    }

    /// All pending alerts for a user, oldest first.
    pub fn for_user(&self, user_id: Uuid) -> Result<Vec<ReminderAlert>, ScheduleError> {
        let pending = self.pending.read().map_err(|_| ScheduleError::LockFailed)?;
        Ok(pending.get(&user_id).cloned().unwrap_or_default())
    }

    /// Drop pending alerts for one medication of one user (taken or
    /// dismissed).
    pub fn clear(&self, user_id: Uuid, medication_id: Uuid) -> Result<(), ScheduleError> {
        let mut pending = self.pending.write().map_err(|_| ScheduleError::LockFailed)?;
        if let Some(alerts) = pending.get_mut(&user_id) {
            alerts.retain(|a| a.medication_id != medication_id);
        }
        Ok(())
    }
}

impl Default for ActiveReminderStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Log of reminders already fired: last local date each (user,
/// medication, time) slot went out. This is the idempotence guard — a
/// reminder fires at most once per day no matter how often the service
/// ticks.
#[derive(Debug, Default)]
pub struct SentLog {
    fired: HashMap<(Uuid, Uuid, NaiveTime), NaiveDate>,
}

impl SentLog {
    fn already_sent(&self, reminder: &ScheduledReminder, today: NaiveDate) -> bool {
        self.fired
            .get(&(reminder.user_id, reminder.medication_id, reminder.time))
            .is_some_and(|date| *date == today)
    }

    fn mark(&mut self, reminder: &ScheduledReminder, today: NaiveDate) {
        self.fired.insert(
            (reminder.user_id, reminder.medication_id, reminder.time),
            today,
        );
    }
}

/// Which scheduled reminders fire at `now`, given what already went out.
pub fn check_due(
    scheduled: &[ScheduledReminder],
    sent: &SentLog,
    now: DateTime<Utc>,
) -> Vec<ReminderAlert> {
    let today = now.date_naive();
    scheduled
        .iter()
        .filter(|r| is_time_match(now.time(), r.time) && !sent.already_sent(r, today))
        .map(|r| ReminderAlert {
            user_id: r.user_id,
            medication_id: r.medication_id,
            medication_name: r.medication_name.clone(),
            dosage: r.dosage.clone(),
            time: r.time,
            fired_at: now,
        })
        .collect()
}

fn is_time_match(now: NaiveTime, reminder: NaiveTime) -> bool {
    let now_mins = i64::from(now.hour() * 60 + now.minute());
    let reminder_mins = i64::from(reminder.hour() * 60 + reminder.minute());
    (now_mins - reminder_mins).abs() <= DUE_TOLERANCE_MINS
}

/// One service tick: poll the source, fire what is due, record it.
/// Source failures are logged and swallowed — the next tick retries.
fn tick(
    source: &dyn ReminderSource,
    store: &ActiveReminderStore,
    sent: &mut SentLog,
    now: DateTime<Utc>,
) {
    let scheduled = match source.scheduled() {
        Ok(scheduled) => scheduled,
        Err(e) => {
            tracing::warn!(error = %e, "reminder source failed, will retry");
            return;
        }
    };

    for reminder in &scheduled {
        if !check_due(std::slice::from_ref(reminder), sent, now).is_empty() {
            sent.mark(reminder, now.date_naive());
            let alert = ReminderAlert {
                user_id: reminder.user_id,
                medication_id: reminder.medication_id,
                medication_name: reminder.medication_name.clone(),
                dosage: reminder.dosage.clone(),
                time: reminder.time,
                fired_at: now,
            };
            tracing::info!(
                user = %alert.user_id,
                medication = %alert.medication_name,
                time = %alert.time,
                "reminder fired"
            );
            if let Err(e) = store.push(alert) {
                tracing::warn!(error = %e, "failed to store reminder alert");
            }
        }
    }
}

/// Handle for the background reminder checker thread.
///
/// Supports graceful shutdown via `shutdown()` or automatic cleanup on
/// `Drop`.
pub struct ReminderService {
    shutdown: Arc<AtomicBool>,
    handle: Option<std::thread::JoinHandle<()>>,
}

impl ReminderService {
    /// Start the checker on a separate thread. The first check runs
    /// immediately; afterwards the service ticks on a fixed interval.
    pub fn start(source: Arc<dyn ReminderSource>, store: Arc<ActiveReminderStore>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = shutdown.clone();

        let handle = std::thread::spawn(move || {
            tracing::info!(
                interval_secs = CHECK_INTERVAL_SECS,
                "reminder service started"
            );
            let mut sent = SentLog::default();

            while !flag.load(Ordering::Relaxed) {
                tick(source.as_ref(), &store, &mut sent, Utc::now());

                // Sleep in small increments for responsive shutdown
                for _ in 0..(CHECK_INTERVAL_SECS / SLEEP_GRANULARITY_SECS) {
                    if flag.load(Ordering::Relaxed) {
                        break;
                    }
                    std::thread::sleep(Duration::from_secs(SLEEP_GRANULARITY_SECS));
                }
            }
            tracing::info!("reminder service stopped");
        });

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Request graceful shutdown; the current tick (if running) completes.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }
}

impl Drop for ReminderService {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reminder(user: Uuid, med: Uuid, time: &str) -> ScheduledReminder {
        ScheduledReminder {
            user_id: user,
            medication_id: med,
            medication_name: "Augmentin".into(),
            dosage: "625 mg".into(),
            time: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
        }
    }

    fn at(time: &str) -> DateTime<Utc> {
        let t = NaiveTime::parse_from_str(time, "%H:%M").unwrap();
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
            .unwrap()
            .with_time(t)
            .unwrap()
    }

    #[test]
    fn fires_within_tolerance_only() {
        let user = Uuid::new_v4();
        let med = Uuid::new_v4();
        let scheduled = vec![reminder(user, med, "09:00")];
        let sent = SentLog::default();

        assert_eq!(check_due(&scheduled, &sent, at("09:00")).len(), 1);
        assert_eq!(check_due(&scheduled, &sent, at("09:01")).len(), 1);
        assert!(check_due(&scheduled, &sent, at("09:05")).is_empty());
        assert!(check_due(&scheduled, &sent, at("21:00")).is_empty());
    }

    #[test]
    fn does_not_refire_same_day() {
        let user = Uuid::new_v4();
        let med = Uuid::new_v4();
        let scheduled = vec![reminder(user, med, "09:00")];
        let mut sent = SentLog::default();

        let now = at("09:00");
        assert_eq!(check_due(&scheduled, &sent, now).len(), 1);
        sent.mark(&scheduled[0], now.date_naive());
        assert!(check_due(&scheduled, &sent, now).is_empty());

        // next day the same slot fires again
        let tomorrow = now + chrono::Duration::days(1);
        assert_eq!(check_due(&scheduled, &sent, tomorrow).len(), 1);
    }

    #[test]
    fn tick_fires_and_records() {
        struct FixedSource(Vec<ScheduledReminder>);
        impl ReminderSource for FixedSource {
            fn scheduled(&self) -> Result<Vec<ScheduledReminder>, ScheduleError> {
                Ok(self.0.clone())
            }
        }

        let user = Uuid::new_v4();
        let med = Uuid::new_v4();
        let source = FixedSource(vec![reminder(user, med, "09:00")]);
        let store = ActiveReminderStore::new();
        let mut sent = SentLog::default();

        tick(&source, &store, &mut sent, at("09:00"));
        assert_eq!(store.for_user(user).unwrap().len(), 1);

        // same tick again within the window: deduped
        tick(&source, &store, &mut sent, at("09:01"));
        assert_eq!(store.for_user(user).unwrap().len(), 1);
    }

    #[test]
    fn tick_survives_failing_source() {
        struct BrokenSource;
        impl ReminderSource for BrokenSource {
            fn scheduled(&self) -> Result<Vec<ScheduledReminder>, ScheduleError> {
                Err(ScheduleError::SourceUnavailable("db offline".into()))
            }
        }

        let store = ActiveReminderStore::new();
        let mut sent = SentLog::default();
        tick(&BrokenSource, &store, &mut sent, at("09:00"));
        assert!(store.for_user(Uuid::new_v4()).unwrap().is_empty());
    }

    #[test]
    fn store_caps_alerts_per_user() {
        let store = ActiveReminderStore::new();
        let user = Uuid::new_v4();

        for i in 0..(MAX_ALERTS_PER_USER + 5) {
            store
                .push(ReminderAlert {
                    user_id: user,
                    medication_id: Uuid::new_v4(),
                    medication_name: format!("med-{i}"),
                    dosage: "1 tablet".into(),
                    time: NaiveTime::parse_from_str("09:00", "%H:%M").unwrap(),
                    fired_at: at("09:00"),
                })
                .unwrap();
        }

        let alerts = store.for_user(user).unwrap();
        assert_eq!(alerts.len(), MAX_ALERTS_PER_USER);
        // the oldest five were evicted
        assert_eq!(alerts[0].medication_name, "med-5");
    }

    #[test]
    fn store_clears_single_medication() {
        let store = ActiveReminderStore::new();
        let user = Uuid::new_v4();
        let keep = Uuid::new_v4();
        let clear = Uuid::new_v4();

        for med in [keep, clear] {
            store
                .push(ReminderAlert {
                    user_id: user,
                    medication_id: med,
                    medication_name: "med".into(),
                    dosage: "1 tablet".into(),
                    time: NaiveTime::parse_from_str("09:00", "%H:%M").unwrap(),
                    fired_at: at("09:00"),
                })
                .unwrap();
        }

        store.clear(user, clear).unwrap();
        let alerts = store.for_user(user).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].medication_id, keep);
    }

    #[test]
    fn service_starts_and_shuts_down_cleanly() {
        struct EmptySource;
        impl ReminderSource for EmptySource {
            fn scheduled(&self) -> Result<Vec<ScheduledReminder>, ScheduleError> {
                Ok(Vec::new())
            }
        }

        let service = ReminderService::start(
            Arc::new(EmptySource),
            Arc::new(ActiveReminderStore::new()),
        );
        service.shutdown();
        drop(service); // joins the thread
    }
}
