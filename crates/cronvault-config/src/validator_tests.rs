use super::*;
use crate::schema::CryptoConfig;
use cronvault_protocols::{MessageBusAction, RestAction, ScheduleDef};

fn job(name: &str) -> ScheduleJob {
    ScheduleJob::new(name, ScheduleDef::interval("1h"))
        .with_action(ScheduleAction::MessageBus(MessageBusAction::new("t", "{}")))
}

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_zero_timeouts() {
    let mut config = Config::default();
    config.scheduler.shutdown_timeout_secs = 0;
    config.scheduler.http_timeout_secs = 0;

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "scheduler.shutdown_timeout_secs"));
    assert!(result.errors.iter().any(|e| e.path == "scheduler.http_timeout_secs"));
}

#[test]
fn test_validate_zero_record_capacity() {
    let mut config = Config::default();
    config.scheduler.record_capacity = 0;

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "scheduler.record_capacity"));
}

#[test]
fn test_validate_unknown_key_source() {
    let mut config = Config::default();
    config.crypto.key_source = "vault".to_string();

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "crypto.key_source"));
}

#[test]
fn test_validate_self_key_length() {
    let mut config = Config::default();
    config.crypto.self_key = Some("too-short".to_string());

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "crypto.self_key"));

    config.crypto.self_key = Some("0123456789abcdef".to_string());
    assert!(ConfigValidator::validate(&config).is_valid());
}

#[test]
fn test_validate_secret_store_requires_file() {
    let mut config = Config::default();
    config.crypto = CryptoConfig {
        key_source: "secret-store".to_string(),
        ..CryptoConfig::default()
    };

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "crypto.secret_file"));
}

#[test]
fn test_validate_duplicate_job_names() {
    let mut config = Config::default();
    config.jobs = vec![job("a"), job("a")];

    let result = ConfigValidator::validate(&config);
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.message.contains("duplicate")));
}

#[test]
fn test_validate_job_without_actions() {
    let mut config = Config::default();
    config.jobs = vec![ScheduleJob::new("empty", ScheduleDef::interval("1h"))];

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "jobs[0].actions"));
}

#[test]
fn test_validate_empty_job_name() {
    let mut config = Config::default();
    config.jobs = vec![job("  ")];

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "jobs[0].name"));
}

#[test]
fn test_validate_locked_job_warning() {
    let mut config = Config::default();
    config.jobs = vec![job("a").with_admin_state(AdminState::Locked)];

    let result = ConfigValidator::validate(&config);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_validate_rest_address() {
    let mut config = Config::default();
    config.jobs = vec![
        ScheduleJob::new("bad", ScheduleDef::interval("1h"))
            .with_action(ScheduleAction::Rest(RestAction::new("not a url", "GET"))),
        ScheduleJob::new("ftp", ScheduleDef::interval("1h"))
            .with_action(ScheduleAction::Rest(RestAction::new("ftp://x/report", "GET"))),
    ];

    let result = ConfigValidator::validate(&config);
    assert!(result.errors.iter().any(|e| e.path == "jobs[0].actions[0].address"));
    assert!(result.warnings.iter().any(|w| w.path == "jobs[1].actions[0].address"));
}

#[test]
fn test_into_result() {
    let mut config = Config::default();
    config.scheduler.shutdown_timeout_secs = 0;
    let err = ConfigValidator::validate(&config).into_result().unwrap_err();
    assert!(err.to_string().contains("scheduler.shutdown_timeout_secs"));

    let warnings = ConfigValidator::validate(&Config::default()).into_result().unwrap();
    assert!(warnings.is_empty());
}
