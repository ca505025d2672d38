use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::API_VERSION;

/// Message published on the bus by a message-bus action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub api_version: String,
    pub correlation_id: String,
    pub content_type: String,
    pub payload: Vec<u8>,
}

impl MessageEnvelope {
    pub fn new(
        correlation_id: impl Into<String>,
        content_type: impl Into<String>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            correlation_id: correlation_id.into(),
            content_type: content_type.into(),
            payload: payload.into(),
        }
    }
}

/// Message-bus client. Retry policy, if any, belongs to the implementation.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, envelope: MessageEnvelope, topic: &str) -> Result<(), CoreError>;
}
