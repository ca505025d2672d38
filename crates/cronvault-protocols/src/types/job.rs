//! Schedule jobs and their trigger definitions.

use serde::{Deserialize, Serialize};

use super::ScheduleAction;

/// A named job: one trigger definition shared by an ordered list of actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleJob {
    /// Unique key into the scheduler manager's registry.
    pub name: String,

    pub definition: ScheduleDef,

    pub actions: Vec<ScheduleAction>,

    #[serde(default)]
    pub admin_state: AdminState,
}

impl ScheduleJob {
    pub fn new(name: impl Into<String>, definition: ScheduleDef) -> Self {
        Self {
            name: name.into(),
            definition,
            actions: Vec::new(),
            admin_state: AdminState::default(),
        }
    }

    pub fn with_action(mut self, action: ScheduleAction) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_admin_state(mut self, admin_state: AdminState) -> Self {
        self.admin_state = admin_state;
        self
    }
}

/// Administrative state. Locked jobs are registered but not started at load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdminState {
    Locked,
    #[default]
    Unlocked,
}

/// Trigger definition of a job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleDef {
    Cron(CronDef),
    Interval(IntervalDef),
}

impl ScheduleDef {
    /// Cron definition using the standard 5-field syntax.
    pub fn cron(crontab: impl Into<String>) -> Self {
        Self::Cron(CronDef {
            crontab: crontab.into(),
            with_seconds: false,
            start_timestamp: None,
            end_timestamp: None,
        })
    }

    /// Cron definition that also accepts a leading seconds field.
    pub fn cron_with_seconds(crontab: impl Into<String>) -> Self {
        Self::Cron(CronDef {
            crontab: crontab.into(),
            with_seconds: true,
            start_timestamp: None,
            end_timestamp: None,
        })
    }

    /// Interval definition, e.g. `"24h"` or `"500ms"`.
    pub fn interval(interval: impl Into<String>) -> Self {
        Self::Interval(IntervalDef {
            interval: interval.into(),
            start_timestamp: None,
            end_timestamp: None,
        })
    }

    /// Restrict firing to the window `[start, end]` (unix milliseconds).
    pub fn with_window(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        match &mut self {
            Self::Cron(def) => {
                def.start_timestamp = start;
                def.end_timestamp = end;
            }
            Self::Interval(def) => {
                def.start_timestamp = start;
                def.end_timestamp = end;
            }
        }
        self
    }

    /// Type tag as it appears on the wire.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Cron(_) => "CRON",
            Self::Interval(_) => "INTERVAL",
        }
    }

    /// Start and end of the firing window in unix milliseconds.
    pub fn window(&self) -> (Option<i64>, Option<i64>) {
        match self {
            Self::Cron(def) => (def.start_timestamp, def.end_timestamp),
            Self::Interval(def) => (def.start_timestamp, def.end_timestamp),
        }
    }
}

/// Cron expression trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CronDef {
    pub crontab: String,

    /// Permit an optional leading seconds field (6-field cron).
    #[serde(default)]
    pub with_seconds: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<i64>,
}

/// Fixed interval trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalDef {
    /// Duration string such as `"24h"`, `"1h30m"` or `"500ms"`.
    pub interval: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<i64>,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
