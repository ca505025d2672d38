use std::sync::Arc;

use async_trait::async_trait;
use cronvault_protocols::{
    CONTENT_TYPE_JSON, CoreError, CoreResult, MessageBusAction, MessageEnvelope, MessagePublisher,
};
use tracing::debug;

use super::{ActionRunner, RunContext};

/// Publishes a fixed payload to a topic.
pub struct MessageBusRunner {
    topic: String,
    content_type: String,
    payload: Vec<u8>,
    publisher: Arc<dyn MessagePublisher>,
}

impl MessageBusRunner {
    pub fn compile(
        action: &MessageBusAction,
        publisher: Arc<dyn MessagePublisher>,
    ) -> CoreResult<Self> {
        if action.topic.trim().is_empty() {
            return Err(CoreError::contract_invalid(
                "message bus action requires a topic",
            ));
        }

        let content_type = action
            .content_type
            .as_deref()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(CONTENT_TYPE_JSON)
            .to_string();

        Ok(Self {
            topic: action.topic.clone(),
            content_type,
            payload: action.payload.clone().into_bytes(),
            publisher,
        })
    }
}

#[async_trait]
impl ActionRunner for MessageBusRunner {
    async fn run(&self, ctx: &RunContext) -> CoreResult<()> {
        let envelope = MessageEnvelope::new(
            ctx.correlation_id.clone(),
            self.content_type.clone(),
            self.payload.clone(),
        );

        self.publisher
            .publish(envelope, &self.topic)
            .await
            .map_err(|e| e.context(format!("failed to publish to {}", self.topic)))?;

        debug!("Published {} bytes to {}", self.payload.len(), self.topic);
        Ok(())
    }
}
