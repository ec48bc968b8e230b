//! Daily reminder scheduling.
//!
//! [`schedule_daily`] spawns a task that wakes once a day at the configured
//! [`NotificationTime`] and runs the reminder check against the shared
//! service. The returned [`ScheduleHandle`] cancels the task; dropping the
//! handle cancels it too, so a schedule never outlives its owner.
//! [`ReminderScheduler`] owns the current handle and swaps it on reconfiguration.

use chrono::{Duration as ChronoDuration, Local, NaiveDate, NaiveDateTime};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::calculate::days_until;
use crate::models::{BirthdayRecord, NotificationTime, ReminderDays, ReminderNotification};
use crate::service::SharedService;

/// Reminders due on `today`.
///
/// A record matches when its days-until is in its own reminder set, or in
/// `defaults` when the record has no set. Records are visited in order.
pub fn check_reminders(
    records: &[BirthdayRecord],
    today: NaiveDate,
    defaults: &ReminderDays,
) -> Vec<ReminderNotification> {
    records
        .iter()
        .filter_map(|record| {
            let days = days_until(&record.date, today);
            record
                .effective_reminder_days(defaults)
                .contains(days)
                .then(|| ReminderNotification::from_record(record, days, today))
        })
        .collect()
}

/// The first firing of `at` strictly after `now`.
pub fn next_fire_after(now: NaiveDateTime, at: NotificationTime) -> NaiveDateTime {
    let today = now.date().and_time(at.as_naive_time());
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

/// Where to look for the next firing after one at `fired_at` completes.
///
/// A late wake-up resumes from `now`, so missed days are skipped rather than
/// fired back to back.
pub fn resume_point(fired_at: NaiveDateTime, now: NaiveDateTime) -> NaiveDateTime {
    fired_at.max(now)
}

/// Cancellable handle to a running daily schedule.
#[derive(Debug)]
pub struct ScheduleHandle {
    at: NotificationTime,
    task: Option<JoinHandle<()>>,
}

impl ScheduleHandle {
    /// Time of day this schedule fires at.
    pub fn at(&self) -> NotificationTime {
        self.at
    }

    /// Stop the schedule. Safe to call more than once.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Cancelled daily check at {}", self.at);
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Spawn the daily check at `at` (local time). Must be called within a tokio runtime.
pub fn schedule_daily(service: SharedService, at: NotificationTime) -> ScheduleHandle {
    let task = tokio::spawn(async move {
        let mut after = Local::now().naive_local();
        loop {
            let next = next_fire_after(after, at);
            let wait = (next - Local::now().naive_local())
                .to_std()
                .unwrap_or_default();
            debug!("Next birthday check at {} (in {:?})", next, wait);

            tokio::time::sleep(wait).await;

            let now = Local::now().naive_local();
            let today = now.date();
            let fired = service.read().await.check_reminders(today);
            info!("Birthday check for {} fired {} reminders", today, fired.len());
            after = resume_point(next, now);
        }
    });

    ScheduleHandle {
        at,
        task: Some(task),
    }
}

/// Owns the active schedule and reissues it when the time changes.
pub struct ReminderScheduler {
    service: SharedService,
    handle: Option<ScheduleHandle>,
}

impl ReminderScheduler {
    pub fn new(service: SharedService) -> Self {
        Self {
            service,
            handle: None,
        }
    }

    /// Start (or restart) the daily check at `at`.
    ///
    /// Any existing schedule is cancelled before the new one is issued.
    pub fn schedule(&mut self, at: NotificationTime) {
        let rescheduling = self.handle.is_some();
        self.stop();
        self.handle = Some(schedule_daily(self.service.clone(), at));

        if rescheduling {
            info!("Rescheduled birthday check to {}", at);
        } else {
            info!("Scheduled birthday check at {}", at);
        }
    }

    pub fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.cancel();
        }
    }

    /// Time of the active schedule, if any.
    pub fn scheduled_at(&self) -> Option<NotificationTime> {
        self.handle.as_ref().map(ScheduleHandle::at)
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(ScheduleHandle::is_active)
    }
}
