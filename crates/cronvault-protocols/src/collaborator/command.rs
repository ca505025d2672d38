use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Response of a device command service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Device command client.
#[async_trait]
pub trait CommandClient: Send + Sync {
    /// Issue a set-command against `source_name` of `device_name`.
    async fn issue_set_command_by_name(
        &self,
        device_name: &str,
        source_name: &str,
        payload: HashMap<String, serde_json::Value>,
    ) -> Result<CommandResponse, CoreError>;
}
