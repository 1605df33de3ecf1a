//! Periodic Job Runner
//!
//! Polls once per second and runs whichever jobs are due, one at a time.
//! Jobs may fan out internally, but two scheduled jobs never overlap.
//!
//! ## Lifecycle
//! 1. **Startup pass**: every job runs once, in the order it was added.
//! 2. **Loop**: due jobs run and are rescheduled from the time they finished.
//!
//! A failing job is logged and rescheduled like a successful one.

use super::registry::JobRegistry;
use super::types::Schedule;

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

struct ScheduledJob {
    name: String,
    schedule: Schedule,
    next_run: Option<DateTime<Local>>,
}

pub struct Scheduler {
    registry: Arc<JobRegistry>,
    jobs: Vec<ScheduledJob>,
}

impl Scheduler {
    pub fn new(registry: Arc<JobRegistry>) -> Self {
        Self {
            registry,
            jobs: Vec::new(),
        }
    }

    /// Schedules a registered job. Order of calls is the startup order.
    pub fn add_job(&mut self, name: &str, schedule: Schedule) {
        if !self.registry.has_job(name) {
            tracing::warn!("Scheduling job '{}' with no registered handler", name);
        }

        let next_run = schedule.next_after(Local::now());
        self.jobs.push(ScheduledJob {
            name: name.to_string(),
            schedule,
            next_run,
        });
    }

    pub fn next_run(&self, name: &str) -> Option<DateTime<Local>> {
        self.jobs
            .iter()
            .find(|job| job.name == name)
            .and_then(|job| job.next_run)
    }

    /// Runs every job once, in order, and schedules each one's next run.
    pub async fn run_startup(&mut self) -> Vec<String> {
        tracing::info!("Running startup pass over {} job(s)", self.jobs.len());

        let mut ran = Vec::with_capacity(self.jobs.len());
        for job in self.jobs.iter_mut() {
            run_job(&self.registry, &job.name).await;
            job.next_run = job.schedule.next_after(Local::now());
            log_next_run(job);
            ran.push(job.name.clone());
        }
        ran
    }

    /// Runs, in order, each job whose next run is at or before `now`.
    pub async fn run_due(&mut self, now: DateTime<Local>) -> Vec<String> {
        let mut ran = Vec::new();
        for job in self.jobs.iter_mut() {
            let due = job.next_run.is_some_and(|next| next <= now);
            if !due {
                continue;
            }

            run_job(&self.registry, &job.name).await;
            job.next_run = job.schedule.next_after(now.max(Local::now()));
            log_next_run(job);
            ran.push(job.name.clone());
        }
        ran
    }

    /// Polls forever.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(POLL_INTERVAL);

        loop {
            interval.tick().await;
            self.run_due(Local::now()).await;
        }
    }
}

async fn run_job(registry: &JobRegistry, name: &str) {
    tracing::info!("Running job '{}'", name);
    match registry.execute(name).await {
        Ok(()) => tracing::info!("Job '{}' completed", name),
        Err(e) => tracing::error!("Job '{}' failed: {:#}", name, e),
    }
}

fn log_next_run(job: &ScheduledJob) {
    if let Some(next) = job.next_run {
        tracing::info!("Scheduled '{}' for {}", job.name, next.format("%Y-%m-%d %H:%M:%S"));
    }
}
