//! Job Registry
//!
//! Maps job names (e.g. "indexer") to async closures. The scheduler only
//! knows names and schedules; what a job does is registered here.

use anyhow::Result;
use dashmap::DashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A thread-safe, repeatable async job.
pub type JobFn = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

pub struct JobRegistry {
    jobs: DashMap<String, JobFn>,
}

impl JobRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers `job` under `name`, replacing any previous job of that name.
    pub fn register<F, Fut>(&self, name: &str, job: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let job_fn: JobFn =
            Arc::new(move || Box::pin(job()) as Pin<Box<dyn Future<Output = Result<()>> + Send>>);

        self.jobs.insert(name.to_string(), job_fn);

        tracing::info!("Registered job: {}", name);
    }

    /// Runs the job registered under `name`.
    pub async fn execute(&self, name: &str) -> Result<()> {
        // Clone out of the map so no shard lock is held across the await
        let job_fn = self.jobs.get(name).map(|entry| entry.value().clone());

        match job_fn {
            Some(job_fn) => job_fn().await,
            None => {
                let error = format!("Unknown job: {}", name);
                tracing::error!("{}", error);
                Err(anyhow::anyhow!(error))
            }
        }
    }

    pub fn has_job(&self, name: &str) -> bool {
        self.jobs.contains_key(name)
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }
}
