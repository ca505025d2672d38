//! In-memory action record sink.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use cronvault_protocols::{ActionRecordSink, CoreError, RecordStatus, ScheduleActionRecord};
use parking_lot::RwLock;

/// Default number of records a [`MemoryRecordSink`] retains.
pub const DEFAULT_RECORD_CAPACITY: usize = 10_000;

/// Keeps the most recent [`ScheduleActionRecord`]s in memory, in arrival
/// order. Once full, the oldest record is dropped for every new one.
pub struct MemoryRecordSink {
    records: RwLock<VecDeque<ScheduleActionRecord>>,
    capacity: usize,
}

impl MemoryRecordSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RECORD_CAPACITY)
    }

    /// Retain at most `capacity` records (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn all(&self) -> Vec<ScheduleActionRecord> {
        self.records.read().iter().cloned().collect()
    }

    pub fn by_job(&self, job_name: &str) -> Vec<ScheduleActionRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.job_name == job_name)
            .cloned()
            .collect()
    }

    pub fn by_status(&self, status: RecordStatus) -> Vec<ScheduleActionRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect()
    }

    /// Most recent record of every job, by creation time.
    pub fn latest_per_job(&self) -> HashMap<String, ScheduleActionRecord> {
        let mut latest: HashMap<String, ScheduleActionRecord> = HashMap::new();
        for record in self.records.read().iter() {
            match latest.get(&record.job_name) {
                Some(existing) if existing.created > record.created => {}
                _ => {
                    latest.insert(record.job_name.clone(), record.clone());
                }
            }
        }
        latest
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Drop every record of `job_name`, returning how many were removed.
    pub fn delete_by_job(&self, job_name: &str) -> usize {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.job_name != job_name);
        before - records.len()
    }
}

impl Default for MemoryRecordSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionRecordSink for MemoryRecordSink {
    async fn add_record(&self, record: ScheduleActionRecord) -> Result<(), CoreError> {
        let mut records = self.records.write();
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cronvault_protocols::{MessageBusAction, ScheduleAction};

    fn record(job: &str, status: RecordStatus, created: i64) -> ScheduleActionRecord {
        let mut record = ScheduleActionRecord::new(
            job,
            ScheduleAction::MessageBus(MessageBusAction::new("t", "")),
            status,
            created,
        );
        record.created = created;
        record
    }

    #[tokio::test]
    async fn test_queries() {
        let sink = MemoryRecordSink::new();
        sink.add_record(record("a", RecordStatus::Succeeded, 1)).await.unwrap();
        sink.add_record(record("b", RecordStatus::Failed, 2)).await.unwrap();
        sink.add_record(record("a", RecordStatus::Failed, 3)).await.unwrap();

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.by_job("a").len(), 2);
        assert_eq!(sink.by_status(RecordStatus::Failed).len(), 2);

        let latest = sink.latest_per_job();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest["a"].created, 3);
        assert_eq!(latest["b"].status, RecordStatus::Failed);
    }

    #[tokio::test]
    async fn test_delete_by_job() {
        let sink = MemoryRecordSink::new();
        sink.add_record(record("a", RecordStatus::Succeeded, 1)).await.unwrap();
        sink.add_record(record("b", RecordStatus::Succeeded, 2)).await.unwrap();

        assert_eq!(sink.delete_by_job("a"), 1);
        assert_eq!(sink.all().len(), 1);
        assert!(sink.by_job("a").is_empty());
        assert!(!sink.is_empty());
    }

    #[tokio::test]
    async fn test_oldest_records_are_evicted() {
        let sink = MemoryRecordSink::with_capacity(3);
        for created in 1..=5 {
            sink.add_record(record("a", RecordStatus::Succeeded, created))
                .await
                .unwrap();
        }

        assert_eq!(sink.len(), 3);
        let created: Vec<i64> = sink.all().iter().map(|r| r.created).collect();
        assert_eq!(created, vec![3, 4, 5]);
        assert_eq!(sink.latest_per_job()["a"].created, 5);
    }

    #[test]
    fn test_capacity_is_at_least_one() {
        assert_eq!(MemoryRecordSink::with_capacity(0).capacity(), 1);
        assert_eq!(MemoryRecordSink::new().capacity(), DEFAULT_RECORD_CAPACITY);
    }
}
