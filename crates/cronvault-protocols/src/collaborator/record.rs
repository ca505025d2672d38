use async_trait::async_trait;

use crate::error::CoreError;
use crate::types::ScheduleActionRecord;

/// Receives the outcome of every action execution.
///
/// Failures are logged by the engine and never reach the job's caller.
#[async_trait]
pub trait ActionRecordSink: Send + Sync {
    async fn add_record(&self, record: ScheduleActionRecord) -> Result<(), CoreError>;
}
