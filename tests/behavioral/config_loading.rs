// ABOUTME: Behavioral tests for configuration loading
// Verifies defaults, file layering, environment overrides and derived paths

use sellcar::config::AppConfig;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test that default config has sensible values for immediate usability
#[test]
fn test_default_config_has_sensible_values() {
    let config = AppConfig::load_from_paths(&[]).unwrap();

    assert_eq!(
        config.version,
        env!("CARGO_PKG_VERSION"),
        "Version should match package version"
    );
    assert!(config.api.base_url.is_empty(), "No API URL until configured");
    assert_eq!(config.location.debounce_ms, 300);
    assert_eq!(config.location.min_query_len, 3);
    assert_eq!(config.location.page_size, 20);
    assert!(config.api.user_agent.starts_with("sellcar/"));
}

#[test]
fn test_missing_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::load_from_paths(&[dir.path().join("nope.toml")]).unwrap();
    assert_eq!(config.api.timeout_secs, 30);
}

#[test]
fn test_env_overrides_file_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[api]\nbase_url = \"https://file.example\"\n[storage]\ndata_dir = \"/from/file\"\n",
    )
    .unwrap();

    let mut config = AppConfig::load_from_paths(&[path]).unwrap();
    let env: HashMap<String, String> = HashMap::from([
        ("SELLCAR_API_URL".to_string(), "https://env.example".to_string()),
        ("SELLCAR_API_TOKEN".to_string(), "secret".to_string()),
    ]);
    config.apply_env(&env);

    assert_eq!(config.api.base_url, "https://env.example");
    assert_eq!(config.api.token.as_deref(), Some("secret"));
    assert_eq!(config.data_dir().unwrap(), PathBuf::from("/from/file"));
    assert_eq!(config.log_dir().unwrap(), PathBuf::from("/from/file/logs"));
}

#[test]
fn test_local_file_does_not_reset_user_settings() {
    let dir = TempDir::new().unwrap();
    let user = dir.path().join("user.toml");
    let local = dir.path().join("local.toml");
    std::fs::write(&user, "[api]\ntimeout_secs = 5\n[location]\ndebounce_ms = 150\n").unwrap();
    std::fs::write(&local, "[api]\nbase_url = \"https://local.example\"\n").unwrap();

    let config = AppConfig::load_from_paths(&[user, local]).unwrap();

    assert_eq!(config.api.base_url, "https://local.example");
    assert_eq!(config.api.timeout_secs, 5, "Timeout from user file should survive");
    assert_eq!(config.location.debounce_ms, 150, "Debounce from user file should survive");
    assert_eq!(config.location.page_size, 20);
}
