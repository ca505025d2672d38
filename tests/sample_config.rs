//! The shipped sample configuration must load, validate and schedule.

use std::path::Path;

use cronvault_config::{ConfigLoader, ConfigValidator};
use cronvault_protocols::AdminState;
use cronvault_scheduler::{ActionCompiler, JobState, SchedulerManager};

#[tokio::test]
async fn test_sample_config_schedules() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/cronvault.toml");
    let config = ConfigLoader::load(&path).unwrap();

    let warnings = ConfigValidator::validate(&config).into_result().unwrap();
    assert!(!warnings.is_empty());
    assert!(config.jobs.iter().all(|j| j.admin_state == AdminState::Locked));

    let manager = SchedulerManager::new(ActionCompiler::default());
    for job in &config.jobs {
        manager.add_schedule_job(job).await.unwrap();
    }

    assert_eq!(manager.job_names(), vec!["daily-report", "nightly-cleanup"]);
    assert_eq!(
        manager.job_status("daily-report").unwrap().state,
        JobState::Created
    );
    assert_eq!(manager.job_status("daily-report").unwrap().actions.len(), 2);

    manager.shutdown().await.unwrap();
    assert!(manager.is_empty());
}
