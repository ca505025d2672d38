//! Compilation of schedule actions into runnable units.
//!
//! Each [`ScheduleAction`] variant compiles to an [`ActionRunner`] that talks
//! to its downstream collaborator through the narrow traits in
//! `cronvault-protocols`. Collaborators are optional on the compiler; an
//! action that needs a missing one fails to compile.

mod device_control;
mod message_bus;
mod rest;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cronvault_protocols::{
    ActionKind, CommandClient, CoreError, CoreResult, MessagePublisher, ScheduleAction,
    ScheduleDef, TokenProvider,
};

pub use device_control::DeviceControlRunner;
pub use message_bus::MessageBusRunner;
pub use rest::RestRunner;

use crate::definition::{TriggerSpec, compile_definition};

/// Per-execution context handed to a runner.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub job_name: String,
    pub correlation_id: String,
    pub scheduled_at: DateTime<Utc>,
}

/// Executes one compiled action.
#[async_trait]
pub trait ActionRunner: Send + Sync {
    async fn run(&self, ctx: &RunContext) -> CoreResult<()>;
}

/// A compiled action together with its source definition.
#[derive(Clone)]
pub struct RunnableUnit {
    action: ScheduleAction,
    runner: Arc<dyn ActionRunner>,
}

impl RunnableUnit {
    pub fn new(action: ScheduleAction, runner: Arc<dyn ActionRunner>) -> Self {
        Self { action, runner }
    }

    pub fn action(&self) -> &ScheduleAction {
        &self.action
    }

    pub fn kind(&self) -> ActionKind {
        self.action.kind()
    }

    pub async fn run(&self, ctx: &RunContext) -> CoreResult<()> {
        self.runner.run(ctx).await
    }
}

impl std::fmt::Debug for RunnableUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnableUnit")
            .field("kind", &self.action.kind())
            .field("target", &self.action.target())
            .finish()
    }
}

/// Turns definitions and actions into triggers and runnable units.
#[derive(Clone)]
pub struct ActionCompiler {
    http: reqwest::Client,
    publisher: Option<Arc<dyn MessagePublisher>>,
    command_client: Option<Arc<dyn CommandClient>>,
    token_provider: Option<Arc<dyn TokenProvider>>,
}

impl ActionCompiler {
    /// Create a compiler issuing REST actions through `http`.
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            publisher: None,
            command_client: None,
            token_provider: None,
        }
    }

    pub fn with_publisher(mut self, publisher: Arc<dyn MessagePublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_command_client(mut self, client: Arc<dyn CommandClient>) -> Self {
        self.command_client = Some(client);
        self
    }

    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    pub fn compile_definition(&self, def: &ScheduleDef) -> CoreResult<TriggerSpec> {
        compile_definition(def)
    }

    pub fn compile_action(&self, action: &ScheduleAction) -> CoreResult<RunnableUnit> {
        let runner: Arc<dyn ActionRunner> = match action {
            ScheduleAction::MessageBus(def) => {
                let publisher = self.publisher.clone().ok_or_else(|| {
                    CoreError::server("no message bus publisher is configured")
                })?;
                Arc::new(MessageBusRunner::compile(def, publisher)?)
            }
            ScheduleAction::Rest(def) => {
                let token_provider = if def.inject_auth {
                    Some(self.token_provider.clone().ok_or_else(|| {
                        CoreError::server(
                            "no token provider is configured for an authenticated REST action",
                        )
                    })?)
                } else {
                    None
                };
                Arc::new(RestRunner::compile(def, self.http.clone(), token_provider)?)
            }
            ScheduleAction::DeviceControl(def) => {
                let client = self
                    .command_client
                    .clone()
                    .ok_or_else(|| CoreError::server("no command client is configured"))?;
                Arc::new(DeviceControlRunner::compile(def, client)?)
            }
        };

        Ok(RunnableUnit::new(action.clone(), runner))
    }
}

impl Default for ActionCompiler {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
