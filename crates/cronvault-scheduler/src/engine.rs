//! Per-job scheduling engine.
//!
//! A [`JobScheduler`] owns one timer task per action. Every action shares the
//! job's [`TriggerSpec`] but fires independently; executions are spawned on a
//! [`TaskTracker`] so that shutdown can wait for in-flight runs. Missed fire
//! times are skipped, never replayed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use cronvault_protocols::{
    ActionRecordSink, CoreError, CoreResult, RecordStatus, ScheduleActionRecord,
};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::action::{RunContext, RunnableUnit};
use crate::definition::TriggerSpec;
use crate::status::{ActionStatus, JobState, JobStatus};

/// State shared by the timer and execution tasks of one job.
struct JobShared {
    job_name: String,
    trigger: TriggerSpec,
    records: Option<Arc<dyn ActionRecordSink>>,
}

/// A runnable unit and its counters.
struct UnitSlot {
    unit: RunnableUnit,
    run_count: AtomicU64,
    failure_count: AtomicU64,
    last_run: Mutex<Option<DateTime<Utc>>>,
    next_run: Mutex<Option<DateTime<Utc>>>,
}

impl UnitSlot {
    fn new(unit: RunnableUnit) -> Self {
        Self {
            unit,
            run_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            last_run: Mutex::new(None),
            next_run: Mutex::new(None),
        }
    }

    fn set_next_run(&self, next: Option<DateTime<Utc>>) {
        *self.next_run.lock() = next;
    }

    fn status(&self) -> ActionStatus {
        let action = self.unit.action();
        ActionStatus {
            kind: action.kind(),
            target: action.target(),
            run_count: self.run_count.load(Ordering::SeqCst),
            failure_count: self.failure_count.load(Ordering::SeqCst),
            last_run: *self.last_run.lock(),
            next_run: *self.next_run.lock(),
        }
    }
}

/// Scheduling context of one job.
pub struct JobScheduler {
    shared: Arc<JobShared>,
    units: Vec<Arc<UnitSlot>>,
    state: watch::Sender<JobState>,
    cancel: CancellationToken,
    tracker: TaskTracker,
    shutdown_timeout: Duration,
}

impl JobScheduler {
    /// Build the engine in the `Created` state. Timers stay dormant until
    /// [`JobScheduler::start`].
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(
        job_name: impl Into<String>,
        trigger: TriggerSpec,
        units: Vec<RunnableUnit>,
        records: Option<Arc<dyn ActionRecordSink>>,
        shutdown_timeout: Duration,
    ) -> Self {
        let (state, _) = watch::channel(JobState::Created);
        let scheduler = Self {
            shared: Arc::new(JobShared {
                job_name: job_name.into(),
                trigger,
                records,
            }),
            units: units.into_iter().map(|u| Arc::new(UnitSlot::new(u))).collect(),
            state,
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
            shutdown_timeout,
        };

        for slot in &scheduler.units {
            scheduler.tracker.spawn(unit_loop(
                scheduler.shared.clone(),
                slot.clone(),
                scheduler.state.subscribe(),
                scheduler.cancel.clone(),
                scheduler.tracker.clone(),
            ));
        }

        scheduler
    }

    pub fn job_name(&self) -> &str {
        &self.shared.job_name
    }

    pub fn state(&self) -> JobState {
        *self.state.borrow()
    }

    /// Start or resume the trigger.
    pub fn start(&self) -> CoreResult<()> {
        self.transition(JobState::Running)
    }

    /// Pause the trigger. Runs already in flight complete.
    pub fn stop(&self) -> CoreResult<()> {
        self.transition(JobState::Stopped)
    }

    fn transition(&self, to: JobState) -> CoreResult<()> {
        let mut torn_down = false;
        self.state.send_if_modified(|state| match *state {
            JobState::ShutDown => {
                torn_down = true;
                false
            }
            current if current == to => false,
            _ => {
                *state = to;
                true
            }
        });

        if torn_down {
            return Err(self.torn_down());
        }
        debug!("Job {} is {}", self.shared.job_name, to);
        Ok(())
    }

    /// Run every action once, now, without touching the regular schedule.
    ///
    /// Returns the number of runs enqueued. Executions happen in the
    /// background; their outcome is logged and recorded.
    pub fn run_now(&self) -> CoreResult<usize> {
        if self.state() == JobState::ShutDown {
            return Err(self.torn_down());
        }

        let scheduled_at = Utc::now();
        for slot in &self.units {
            spawn_execution(&self.tracker, self.shared.clone(), slot.clone(), scheduled_at);
        }
        debug!(
            "Triggered {} action(s) of job {}",
            self.units.len(),
            self.shared.job_name
        );
        Ok(self.units.len())
    }

    /// Stop all timers and wait, bounded by the shutdown timeout, for
    /// in-flight runs to finish.
    pub async fn shutdown(&self) -> CoreResult<()> {
        self.state.send_replace(JobState::ShutDown);
        self.cancel.cancel();
        self.tracker.close();

        let waited = tokio::time::timeout(self.shutdown_timeout, self.tracker.wait()).await;
        for slot in &self.units {
            slot.set_next_run(None);
        }

        match waited {
            Ok(()) => {
                debug!("Job {} shut down", self.shared.job_name);
                Ok(())
            }
            Err(_) => Err(CoreError::server(format!(
                "job {} did not shut down within {:?}",
                self.shared.job_name, self.shutdown_timeout
            ))),
        }
    }

    pub fn status(&self) -> JobStatus {
        JobStatus {
            name: self.shared.job_name.clone(),
            state: self.state(),
            trigger: self.shared.trigger.to_string(),
            actions: self.units.iter().map(|slot| slot.status()).collect(),
        }
    }

    fn torn_down(&self) -> CoreError {
        CoreError::server(format!(
            "scheduler of job {} has been shut down",
            self.shared.job_name
        ))
    }
}

impl Drop for JobScheduler {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Timer task of one unit: waits while the job is not running, otherwise
/// sleeps until the next fire time and spawns an execution.
async fn unit_loop(
    shared: Arc<JobShared>,
    slot: Arc<UnitSlot>,
    mut state_rx: watch::Receiver<JobState>,
    cancel: CancellationToken,
    tracker: TaskTracker,
) {
    let mut last_fire: Option<DateTime<Utc>> = None;

    loop {
        let state = *state_rx.borrow_and_update();
        match state {
            JobState::ShutDown => break,
            JobState::Running => {}
            JobState::Created | JobState::Stopped => {
                last_fire = None;
                slot.set_next_run(None);
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    changed = state_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        continue;
                    }
                }
            }
        }

        let now = Utc::now();
        let from = *last_fire.get_or_insert(now);
        let next = match shared.trigger.next_fire(from) {
            Some(next) if next >= now => Some(next),
            Some(_) => shared.trigger.next_fire(now),
            None => None,
        };

        let Some(next) = next else {
            slot.set_next_run(None);
            debug!(
                "Trigger of job {} has no further fire times",
                shared.job_name
            );
            break;
        };

        slot.set_next_run(Some(next));
        let delay = (next - now).to_std().unwrap_or_default();

        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(delay) => {
                last_fire = Some(next);
                spawn_execution(&tracker, shared.clone(), slot.clone(), next);
            }
        }
    }
}

fn spawn_execution(
    tracker: &TaskTracker,
    shared: Arc<JobShared>,
    slot: Arc<UnitSlot>,
    scheduled_at: DateTime<Utc>,
) {
    tracker.spawn(async move { execute(&shared, &slot, scheduled_at).await });
}

async fn execute(shared: &JobShared, slot: &UnitSlot, scheduled_at: DateTime<Utc>) {
    let correlation_id = Uuid::new_v4().to_string();
    let span = info_span!(
        "action",
        job = %shared.job_name,
        action = %slot.unit.kind(),
        correlation_id = %correlation_id
    );

    async move {
        let ctx = RunContext {
            job_name: shared.job_name.clone(),
            correlation_id,
            scheduled_at,
        };
        let target = slot.unit.action().target();

        *slot.last_run.lock() = Some(Utc::now());
        let status = match slot.unit.run(&ctx).await {
            Ok(()) => {
                debug!("Action {} succeeded", target);
                RecordStatus::Succeeded
            }
            Err(e) => {
                warn!("Action {} failed: {}", target, e);
                slot.failure_count.fetch_add(1, Ordering::SeqCst);
                RecordStatus::Failed
            }
        };
        slot.run_count.fetch_add(1, Ordering::SeqCst);

        if let Some(sink) = &shared.records {
            let record = ScheduleActionRecord::new(
                shared.job_name.clone(),
                slot.unit.action().clone(),
                status,
                scheduled_at.timestamp_millis(),
            );
            if let Err(e) = sink.add_record(record).await {
                error!("Failed to record run of action {}: {}", target, e);
            }
        }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
