use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use std::time::Duration;

/// When a registered job runs after the startup pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Runs in the startup pass only.
    Startup,
    /// Fixed interval measured from the end of the previous run.
    Every(Duration),
    /// Once a day at `hour:00` local time.
    DailyAt { hour: u32 },
}

impl Schedule {
    /// Next run time for a job that last finished at `now`.
    pub fn next_after(&self, now: DateTime<Local>) -> Option<DateTime<Local>> {
        match *self {
            Schedule::Startup => None,
            Schedule::Every(interval) => TimeDelta::from_std(interval)
                .ok()
                .and_then(|delta| now.checked_add_signed(delta)),
            Schedule::DailyAt { hour } => Some(next_daily_run(hour, now)),
        }
    }
}

/// The first `hour:00` local time strictly after `now`.
pub fn next_daily_run(hour: u32, now: DateTime<Local>) -> DateTime<Local> {
    let one_day = TimeDelta::days(1);
    let Some(at) = NaiveTime::from_hms_opt(hour, 0, 0) else {
        return now + one_day;
    };

    let mut candidate = now.date_naive().and_time(at);
    if candidate <= now.naive_local() {
        candidate += one_day;
    }

    // A local time skipped by a DST jump has no mapping; fall back to a day from now
    Local
        .from_local_datetime(&candidate)
        .earliest()
        .unwrap_or(now + one_day)
}
