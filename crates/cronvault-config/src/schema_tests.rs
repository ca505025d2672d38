use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.log.level, "info");
    assert!(config.log.directory.is_none());
    assert_eq!(config.scheduler.shutdown_timeout_secs, 30);
    assert_eq!(config.scheduler.http_timeout(), Duration::from_secs(30));
    assert_eq!(config.scheduler.record_capacity, 10_000);
    assert_eq!(config.crypto.key_source, KEY_SOURCE_SELF);
    assert!(!config.crypto.uses_secret_store());
    assert!(config.jobs.is_empty());
}

#[test]
fn test_user_agent_default() {
    let config = SchedulerConfig::default();
    assert!(config.user_agent.starts_with("cronvault/"));
}

#[test]
fn test_uses_secret_store() {
    let config = CryptoConfig {
        key_source: KEY_SOURCE_SECRET_STORE.to_string(),
        ..CryptoConfig::default()
    };
    assert!(config.uses_secret_store());
}

#[test]
fn test_config_serialization_roundtrip() {
    let config = Config::default();
    let toml = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&toml).unwrap();
    assert_eq!(parsed.scheduler.user_agent, config.scheduler.user_agent);
}
