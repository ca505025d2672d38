//! # Cronvault Scheduler
//!
//! Maintains a dynamic, named collection of recurring jobs. Every job owns
//! one trigger (cron or interval) shared by one or more actions; each action
//! fires independently when the trigger does.
//!
//! ## Architecture
//!
//! ```text
//! SchedulerManager ── name → JobScheduler (RwLock, held only for lookup/insert/remove)
//!        │
//!        ├── ActionCompiler: ScheduleDef → TriggerSpec, ScheduleAction → RunnableUnit
//!        │
//!        └── JobScheduler: created → running ⇄ stopped → shut down
//!               ├── one timer task per action
//!               └── executions on a TaskTracker → ActionRecordSink
//! ```
//!
//! ## Key Components
//!
//! - [`SchedulerManager`]: add/update/delete/start/stop/trigger/shutdown by name
//! - [`ActionCompiler`]: compiles definitions and actions
//! - [`JobScheduler`]: per-job engine
//! - [`MemoryRecordSink`]: in-memory [`ActionRecordSink`](cronvault_protocols::ActionRecordSink)

pub mod action;
pub mod definition;
pub mod engine;
pub mod manager;
pub mod record;
pub mod status;

#[cfg(test)]
mod test_support;

pub use action::{ActionCompiler, ActionRunner, RunContext, RunnableUnit};
pub use definition::{TriggerKind, TriggerSpec, compile_definition};
pub use engine::JobScheduler;
pub use manager::{DEFAULT_SHUTDOWN_TIMEOUT, SchedulerManager};
pub use record::{DEFAULT_RECORD_CAPACITY, MemoryRecordSink};
pub use status::{ActionStatus, JobState, JobStatus};
