//! Trigger definitions compiled from [`ScheduleDef`].

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use cron::Schedule;
use cronvault_protocols::{CoreError, CoreResult, CronDef, ScheduleDef};

/// What drives a trigger.
#[derive(Debug, Clone)]
pub enum TriggerKind {
    Cron(Box<Schedule>),
    Interval(Duration),
}

/// Executable schedule shared by every action of a job.
#[derive(Debug, Clone)]
pub struct TriggerSpec {
    kind: TriggerKind,
    start_at: Option<DateTime<Utc>>,
    end_at: Option<DateTime<Utc>>,
}

impl TriggerSpec {
    pub fn cron(schedule: Schedule) -> Self {
        Self {
            kind: TriggerKind::Cron(Box::new(schedule)),
            start_at: None,
            end_at: None,
        }
    }

    pub fn interval(every: Duration) -> Self {
        Self {
            kind: TriggerKind::Interval(every),
            start_at: None,
            end_at: None,
        }
    }

    /// Restrict firing to `[start_at, end_at]`.
    pub fn with_window(
        mut self,
        start_at: Option<DateTime<Utc>>,
        end_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_at = start_at;
        self.end_at = end_at;
        self
    }

    pub fn kind(&self) -> &TriggerKind {
        &self.kind
    }

    pub fn start_at(&self) -> Option<DateTime<Utc>> {
        self.start_at
    }

    pub fn end_at(&self) -> Option<DateTime<Utc>> {
        self.end_at
    }

    /// First fire time strictly after `after`, or `None` once the window has
    /// closed.
    ///
    /// An interval trigger whose window opens later fires first at the window
    /// start; a cron trigger fires at its first occurrence after it.
    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let pending_start = self.start_at.filter(|start| *start > after);

        let next = match &self.kind {
            TriggerKind::Cron(schedule) => {
                let from = pending_start.unwrap_or(after);
                schedule.after(&from).next()?
            }
            TriggerKind::Interval(every) => match pending_start {
                Some(start) => start,
                None => after.checked_add_signed(chrono::Duration::from_std(*every).ok()?)?,
            },
        };

        match self.end_at {
            Some(end) if next > end => None,
            _ => Some(next),
        }
    }
}

impl fmt::Display for TriggerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TriggerKind::Cron(schedule) => write!(f, "cron({})", schedule),
            TriggerKind::Interval(every) => {
                write!(f, "every {}", humantime::format_duration(*every))
            }
        }
    }
}

/// Compile a schedule definition into a trigger.
pub fn compile_definition(def: &ScheduleDef) -> CoreResult<TriggerSpec> {
    let (start, end) = def.window();
    let start_at = start.map(timestamp_ms).transpose()?;
    let end_at = end.map(timestamp_ms).transpose()?;

    if let (Some(start), Some(end)) = (start_at, end_at) {
        if end < start {
            return Err(CoreError::contract_invalid(
                "end timestamp must not precede start timestamp",
            ));
        }
    }

    let trigger = match def {
        ScheduleDef::Cron(cron_def) => match every_descriptor(&cron_def.crontab) {
            Some(every) => TriggerSpec::interval(parse_duration(every)?),
            None => TriggerSpec::cron(parse_cron(cron_def)?),
        },
        ScheduleDef::Interval(interval_def) => {
            TriggerSpec::interval(parse_duration(&interval_def.interval)?)
        }
    };
    Ok(trigger.with_window(start_at, end_at))
}

fn timestamp_ms(ms: i64) -> CoreResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| CoreError::contract_invalid(format!("invalid timestamp: {}", ms)))
}

/// Duration of an `@every <duration>` crontab, which runs as an interval
/// trigger.
fn every_descriptor(crontab: &str) -> Option<&str> {
    crontab
        .trim()
        .strip_prefix("@every")
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .map(str::trim)
}

/// Parse a crontab.
///
/// Five fields are the standard `minute hour day month weekday` form. With
/// `with_seconds` a leading seconds field is also accepted. `@`-descriptors
/// such as `@daily` are passed through. Numeric weekdays follow crontab
/// (0 or 7 is Sunday).
fn parse_cron(def: &CronDef) -> CoreResult<Schedule> {
    let crontab = def.crontab.trim();
    if crontab.is_empty() {
        return Err(CoreError::contract_invalid("crontab must not be empty"));
    }

    let expression = if crontab.starts_with('@') {
        crontab.to_string()
    } else {
        let mut fields: Vec<&str> = crontab.split_whitespace().collect();
        match fields.len() {
            5 => fields.insert(0, "0"),
            6 if def.with_seconds => {}
            6 => {
                return Err(CoreError::contract_invalid(format!(
                    "crontab {:?} has a seconds field but with_seconds is not set",
                    crontab
                )));
            }
            n => {
                return Err(CoreError::contract_invalid(format!(
                    "crontab {:?} has {} fields, expected 5{}",
                    crontab,
                    n,
                    if def.with_seconds { " or 6" } else { "" }
                )));
            }
        }

        let weekday = crontab_weekdays(fields[5])
            .map_err(|e| e.context(format!("crontab {:?}", crontab)))?;
        let mut expression = fields[..5].join(" ");
        expression.push(' ');
        expression.push_str(&weekday);
        expression
    };

    Schedule::from_str(&expression).map_err(|e| {
        CoreError::contract_invalid(format!("invalid crontab {:?}", crontab)).with_source(e)
    })
}

/// Rewrite a crontab weekday field (0-6, Sunday = 0, 7 also Sunday) into the
/// 1-7 numbering of the `cron` crate (Sunday = 1).
///
/// Numeric items, ranges and steps are expanded into an explicit list.
/// Names and `*` pass through; `*/n` already selects the same days in both
/// numberings.
fn crontab_weekdays(field: &str) -> CoreResult<String> {
    let mut items = Vec::new();

    for item in field.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => (base, Some(step)),
            None => (item, None),
        };

        let bounds = match base.split_once('-') {
            Some((from, to)) => weekday_number(from).zip(weekday_number(to)),
            None => weekday_number(base).map(|day| (day, if step.is_some() { 6 } else { day })),
        };
        let Some((from, to)) = bounds else {
            items.push(item.to_string());
            continue;
        };

        let step = match step {
            Some(step) => step
                .parse::<u32>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    CoreError::contract_invalid(format!("invalid weekday step {:?}", step))
                })?,
            None => 1,
        };
        if from > 7 || to > 7 || from > to {
            return Err(CoreError::contract_invalid(format!(
                "invalid weekday {:?}",
                item
            )));
        }

        let mut day = from;
        while day <= to {
            items.push(((day % 7) + 1).to_string());
            day += step;
        }
    }

    Ok(items.join(","))
}

fn weekday_number(value: &str) -> Option<u32> {
    value.parse().ok()
}

fn parse_duration(interval: &str) -> CoreResult<Duration> {
    let every = humantime::parse_duration(interval.trim()).map_err(|e| {
        CoreError::contract_invalid(format!("invalid interval {:?}", interval)).with_source(e)
    })?;
    if every.is_zero() {
        return Err(CoreError::contract_invalid("interval must be greater than zero"));
    }

    let representable = chrono::Duration::from_std(every)
        .ok()
        .and_then(|d| Utc::now().checked_add_signed(d))
        .is_some();
    if !representable {
        return Err(CoreError::contract_invalid(format!(
            "interval {:?} is too large",
            interval
        )));
    }
    Ok(every)
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
