//! Schedule action records: the outcome of one action execution.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ScheduleAction;

/// Outcome of an action execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Succeeded,
    Failed,
}

/// Record emitted after every scheduled or manually triggered run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleActionRecord {
    pub id: String,

    pub job_name: String,

    pub action: ScheduleAction,

    pub status: RecordStatus,

    /// When the run started, unix milliseconds.
    pub scheduled_at: i64,

    /// When the record was created, unix milliseconds.
    pub created: i64,
}

impl ScheduleActionRecord {
    pub fn new(
        job_name: impl Into<String>,
        action: ScheduleAction,
        status: RecordStatus,
        scheduled_at: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            job_name: job_name.into(),
            action,
            status,
            scheduled_at,
            created: chrono::Utc::now().timestamp_millis(),
        }
    }
}
