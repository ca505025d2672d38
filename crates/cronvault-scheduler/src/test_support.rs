//! Fakes shared by the unit tests of this crate.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cronvault_protocols::{
    CoreError, CoreResult, MessageBusAction, MessageEnvelope, MessagePublisher, ScheduleAction,
};
use parking_lot::Mutex;

use crate::action::{ActionRunner, RunContext, RunnableUnit};

/// Runner counting its executions, optionally slow or failing.
#[derive(Default)]
pub struct CountingRunner {
    pub runs: AtomicUsize,
    pub delay: Duration,
    pub fail: bool,
}

impl CountingRunner {
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActionRunner for CountingRunner {
    async fn run(&self, _ctx: &RunContext) -> CoreResult<()> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.runs.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CoreError::server("boom"));
        }
        Ok(())
    }
}

pub fn unit(runner: Arc<CountingRunner>) -> RunnableUnit {
    RunnableUnit::new(
        ScheduleAction::MessageBus(MessageBusAction::new("test/topic", "")),
        runner,
    )
}

/// Publisher remembering the topic of every publish.
#[derive(Default)]
pub struct RecordingPublisher {
    topics: Mutex<Vec<String>>,
}

impl RecordingPublisher {
    pub fn topics(&self) -> Vec<String> {
        self.topics.lock().clone()
    }
}

#[async_trait]
impl MessagePublisher for RecordingPublisher {
    async fn publish(&self, _envelope: MessageEnvelope, topic: &str) -> Result<(), CoreError> {
        self.topics.lock().push(topic.to_string());
        Ok(())
    }
}

/// Poll `cond` until it holds, panicking after five seconds.
pub async fn wait_for(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition not reached within 5s");
}
