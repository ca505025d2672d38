//! Schedule actions.
//!
//! An action has no identity outside its owning job. Every action of a job
//! shares the job's trigger definition.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One unit of work fired by a job's trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleAction {
    MessageBus(MessageBusAction),
    Rest(RestAction),
    DeviceControl(DeviceControlAction),
}

impl ScheduleAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::MessageBus(_) => ActionKind::MessageBus,
            Self::Rest(_) => ActionKind::Rest,
            Self::DeviceControl(_) => ActionKind::DeviceControl,
        }
    }

    /// Short human readable target, used in logs.
    pub fn target(&self) -> String {
        match self {
            Self::MessageBus(a) => a.topic.clone(),
            Self::Rest(a) => format!("{} {}", a.method, a.address),
            Self::DeviceControl(a) => format!("{}/{}", a.device_name, a.source_name),
        }
    }
}

/// Discriminant of [`ScheduleAction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    MessageBus,
    Rest,
    DeviceControl,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MessageBus => "MESSAGE_BUS",
            Self::Rest => "REST",
            Self::DeviceControl => "DEVICE_CONTROL",
        };
        f.write_str(name)
    }
}

/// Publish a payload to a message-bus topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBusAction {
    pub topic: String,

    /// Defaults to JSON when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default)]
    pub payload: String,
}

impl MessageBusAction {
    pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            content_type: None,
            payload: payload.into(),
        }
    }
}

/// Issue an HTTP request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestAction {
    pub address: String,

    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// Request body; empty means no body.
    #[serde(default)]
    pub payload: String,

    /// Attach a bearer token from the configured token provider.
    #[serde(default)]
    pub inject_auth: bool,
}

fn default_method() -> String {
    "GET".to_string()
}

impl RestAction {
    pub fn new(address: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            method: method.into(),
            content_type: None,
            payload: String::new(),
            inject_auth: false,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_auth(mut self) -> Self {
        self.inject_auth = true;
        self
    }
}

/// Issue a set-command to a device resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceControlAction {
    pub device_name: String,

    pub source_name: String,

    /// JSON object; decoded into a string-keyed map when compiled.
    #[serde(default)]
    pub payload: String,
}

impl DeviceControlAction {
    pub fn new(
        device_name: impl Into<String>,
        source_name: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            device_name: device_name.into(),
            source_name: source_name.into(),
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
#[path = "action_tests.rs"]
mod tests;
