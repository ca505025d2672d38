//! `run` and `validate` subcommand handlers.

use std::sync::Arc;

use tracing::{error, info, warn};

use cronvault_config::{Config, ConfigValidator};
use cronvault_protocols::{AdminState, RecordStatus};
use cronvault_scheduler::{ActionCompiler, MemoryRecordSink, SchedulerManager};

use crate::cmd_crypto::provision_key;

/// Schedule every configured job, start the unlocked ones and block until
/// Ctrl-C, then shut the manager down.
pub(crate) async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting cronvault v{}", env!("CARGO_PKG_VERSION"));

    for warning in ConfigValidator::validate(&config).into_result()? {
        warn!("{}: {}", warning.path, warning.message);
    }

    let key_source = provision_key(&config.crypto).await?;
    info!("Encryption at rest uses key source {}", key_source);

    let http = reqwest::Client::builder()
        .timeout(config.scheduler.http_timeout())
        .user_agent(config.scheduler.user_agent.as_str())
        .build()?;

    let records = Arc::new(MemoryRecordSink::with_capacity(
        config.scheduler.record_capacity,
    ));
    let manager = SchedulerManager::new(ActionCompiler::new(http))
        .with_record_sink(records.clone())
        .with_shutdown_timeout(config.scheduler.shutdown_timeout());

    for job in &config.jobs {
        if let Err(e) = manager.add_schedule_job(job).await {
            error!("Job {} not scheduled: {}", job.name, e);
            continue;
        }
        match job.admin_state {
            AdminState::Unlocked => manager.start_schedule_job_by_name(&job.name)?,
            AdminState::Locked => info!("Job {} is locked, not starting", job.name),
        }
    }

    info!("{} job(s) scheduled, press Ctrl-C to stop", manager.len());
    tokio::signal::ctrl_c().await?;

    info!("Shutting down");
    let result = manager.shutdown().await;
    info!(
        "{} action run(s) recorded, {} failed",
        records.len(),
        records.by_status(RecordStatus::Failed).len()
    );
    result?;

    Ok(())
}

/// Print validation errors and warnings. Fails when there are errors.
pub(crate) fn validate(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let result = ConfigValidator::validate(config);

    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }

    if !result.is_valid() {
        return Err(format!("{} validation error(s)", result.errors.len()).into());
    }

    println!("Configuration is valid ({} job(s))", config.jobs.len());
    Ok(())
}
