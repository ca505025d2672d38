//! Lifecycle state and status snapshots of scheduled jobs.

use std::fmt;

use chrono::{DateTime, Utc};
use cronvault_protocols::ActionKind;
use serde::{Deserialize, Serialize};

/// Lifecycle of a job's scheduling engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Registered, trigger dormant until started.
    Created,
    Running,
    /// Paused; compiled units are kept.
    Stopped,
    /// Torn down, no further runs.
    ShutDown,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::ShutDown => "shut_down",
        };
        f.write_str(name)
    }
}

/// Point-in-time view of one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub name: String,
    pub state: JobState,
    /// Human readable trigger, e.g. `every 1day`.
    pub trigger: String,
    pub actions: Vec<ActionStatus>,
}

impl JobStatus {
    /// Runs across all actions.
    pub fn run_count(&self) -> u64 {
        self.actions.iter().map(|a| a.run_count).sum()
    }
}

/// Point-in-time view of one action of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionStatus {
    pub kind: ActionKind,
    pub target: String,
    pub run_count: u64,
    pub failure_count: u64,
    pub last_run: Option<DateTime<Utc>>,
    /// Next scheduled fire; `None` unless the job is running.
    pub next_run: Option<DateTime<Utc>>,
}
