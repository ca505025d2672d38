//! Registry of named job schedulers.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use std::time::Duration;

use cronvault_protocols::{ActionRecordSink, CoreError, CoreResult, ScheduleJob};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::action::ActionCompiler;
use crate::engine::JobScheduler;
use crate::status::JobStatus;

/// Default bound on waiting for a job's in-flight runs at teardown.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns every job's scheduling context, keyed by job name.
///
/// The registry lock is held only for lookups and map mutation, never
/// across compilation or engine teardown.
pub struct SchedulerManager {
    compiler: ActionCompiler,
    records: Option<Arc<dyn ActionRecordSink>>,
    shutdown_timeout: Duration,
    schedulers: RwLock<HashMap<String, Arc<JobScheduler>>>,
}

impl SchedulerManager {
    pub fn new(compiler: ActionCompiler) -> Self {
        Self {
            compiler,
            records: None,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
            schedulers: RwLock::new(HashMap::new()),
        }
    }

    /// Emit a record for every action run to `sink`.
    pub fn with_record_sink(mut self, sink: Arc<dyn ActionRecordSink>) -> Self {
        self.records = Some(sink);
        self
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    fn scheduler(&self, name: &str) -> CoreResult<Arc<JobScheduler>> {
        self.schedulers
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::not_found(format!("job {} not found", name)))
    }

    fn conflict(name: &str) -> CoreError {
        CoreError::conflict(format!("job {} already exists", name))
    }

    /// Compile `job` and register it in the `Created` state.
    pub async fn add_schedule_job(&self, job: &ScheduleJob) -> CoreResult<()> {
        if job.name.trim().is_empty() {
            return Err(CoreError::contract_invalid("job name must not be empty"));
        }
        if job.actions.is_empty() {
            return Err(CoreError::contract_invalid(format!(
                "job {} has no actions",
                job.name
            )));
        }
        if self.schedulers.read().contains_key(&job.name) {
            return Err(Self::conflict(&job.name));
        }

        let trigger = self
            .compiler
            .compile_definition(&job.definition)
            .map_err(|e| e.context(format!("job {}", job.name)))?;
        let units = job
            .actions
            .iter()
            .enumerate()
            .map(|(i, action)| {
                self.compiler
                    .compile_action(action)
                    .map_err(|e| e.context(format!("job {} action {}", job.name, i)))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let scheduler = Arc::new(JobScheduler::new(
            job.name.clone(),
            trigger,
            units,
            self.records.clone(),
            self.shutdown_timeout,
        ));

        let inserted = match self.schedulers.write().entry(job.name.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(scheduler.clone());
                true
            }
        };

        if !inserted {
            // Lost a race with a concurrent add of the same name.
            if let Err(e) = scheduler.shutdown().await {
                warn!("Failed to tear down duplicate job {}: {}", job.name, e);
            }
            return Err(Self::conflict(&job.name));
        }

        info!(
            "Added job {} ({}, {} action(s))",
            job.name,
            job.definition.type_name(),
            job.actions.len()
        );
        Ok(())
    }

    /// Replace an existing job: delete, then add.
    ///
    /// If the new definition fails to compile the old job is already gone.
    pub async fn update_schedule_job(&self, job: &ScheduleJob) -> CoreResult<()> {
        self.scheduler(&job.name)?;
        self.delete_schedule_job_by_name(&job.name).await?;
        self.add_schedule_job(job).await.map_err(|e| {
            e.context(format!(
                "job {} was removed but could not be re-added",
                job.name
            ))
        })
    }

    /// Shut down the job's engine and remove it.
    pub async fn delete_schedule_job_by_name(&self, name: &str) -> CoreResult<()> {
        let scheduler = self.scheduler(name)?;
        let result = scheduler.shutdown().await;

        {
            let mut schedulers = self.schedulers.write();
            if schedulers
                .get(name)
                .is_some_and(|current| Arc::ptr_eq(current, &scheduler))
            {
                schedulers.remove(name);
            }
        }

        result.map_err(|e| e.context(format!("job {} removed after unclean shutdown", name)))?;
        info!("Deleted job {}", name);
        Ok(())
    }

    pub fn start_schedule_job_by_name(&self, name: &str) -> CoreResult<()> {
        self.scheduler(name)?.start()?;
        debug!("Started job {}", name);
        Ok(())
    }

    pub fn stop_schedule_job_by_name(&self, name: &str) -> CoreResult<()> {
        self.scheduler(name)?.stop()?;
        debug!("Stopped job {}", name);
        Ok(())
    }

    /// Run every action of the job once, now. Outcomes are logged and
    /// recorded, not returned.
    pub fn trigger_schedule_job_by_name(&self, name: &str) -> CoreResult<()> {
        let enqueued = self.scheduler(name)?.run_now()?;
        debug!("Triggered job {} ({} action(s))", name, enqueued);
        Ok(())
    }

    /// Delete every job. Keeps going after a failure and returns the first
    /// error once all jobs have been attempted.
    pub async fn shutdown(&self) -> CoreResult<()> {
        let mut first_error = None;

        for name in self.job_names() {
            match self.delete_schedule_job_by_name(&name).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    warn!("Failed to shut down job {}: {}", name, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Scheduler manager shut down");
                Ok(())
            }
        }
    }

    pub fn job_status(&self, name: &str) -> CoreResult<JobStatus> {
        Ok(self.scheduler(name)?.status())
    }

    /// Registered job names, sorted.
    pub fn job_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schedulers.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schedulers.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.schedulers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedulers.read().is_empty()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
