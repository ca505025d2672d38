use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cronvault_protocols::{CommandClient, CoreError, CoreResult, DeviceControlAction};
use tracing::debug;

use super::{ActionRunner, RunContext};

/// Issues a set-command to a device resource.
pub struct DeviceControlRunner {
    device_name: String,
    source_name: String,
    payload: HashMap<String, serde_json::Value>,
    client: Arc<dyn CommandClient>,
}

impl DeviceControlRunner {
    pub fn compile(
        action: &DeviceControlAction,
        client: Arc<dyn CommandClient>,
    ) -> CoreResult<Self> {
        if action.device_name.trim().is_empty() {
            return Err(CoreError::contract_invalid(
                "device control action requires a device name",
            ));
        }
        if action.source_name.trim().is_empty() {
            return Err(CoreError::contract_invalid(
                "device control action requires a source name",
            ));
        }

        let payload = serde_json::from_str(&action.payload).map_err(|e| {
            CoreError::contract_invalid("device control payload must be a JSON object")
                .with_source(e)
        })?;

        Ok(Self {
            device_name: action.device_name.clone(),
            source_name: action.source_name.clone(),
            payload,
            client,
        })
    }
}

#[async_trait]
impl ActionRunner for DeviceControlRunner {
    async fn run(&self, _ctx: &RunContext) -> CoreResult<()> {
        let response = self
            .client
            .issue_set_command_by_name(&self.device_name, &self.source_name, self.payload.clone())
            .await
            .map_err(|e| {
                e.context(format!(
                    "failed to issue set command to {}/{}",
                    self.device_name, self.source_name
                ))
            })?;

        if !(200..300).contains(&response.status_code) {
            return Err(CoreError::server(format!(
                "set command to {}/{} returned {}: {}",
                self.device_name,
                self.source_name,
                response.status_code,
                response.message.unwrap_or_default()
            )));
        }

        debug!(
            "Issued set command to {}/{}",
            self.device_name, self.source_name
        );
        Ok(())
    }
}
