// Config loading tests - AppConfig::load against files on disk and the
// process environment.

use mongo_mcp_client::config::{AppConfig, ConfigError};
use serial_test::serial;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("client.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

fn clear_azure_env() {
    for name in [
        "AZURE_ENDPOINT_EUS",
        "AZURE_OPENAI_API_KEY_EUS",
        "AZURE_OPENAI_API_VERSION",
    ] {
        // SAFETY: tests touching the environment are serialized.
        unsafe { std::env::remove_var(name) };
    }
}

#[test]
fn returns_error_when_file_not_found() {
    let result = AppConfig::load(Some(Path::new("/nonexistent/path/client.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
fn returns_error_on_malformed_toml() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "thread_id = [unterminated");

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn rejects_out_of_range_temperature() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "[model]\ntemperature = 3.5\n");

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::InvalidTemperature { .. })));
}

#[test]
fn rejects_zero_recursion_limit() {
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "recursion_limit = 0\n");

    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::InvalidRecursionLimit)));
}

#[test]
#[serial]
fn file_values_override_defaults() {
    clear_azure_env();
    let dir = tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"
thread_id = "ops-thread"
recursion_limit = 10

[model]
deployment = "gpt-4o"
max_retries = 1

[server]
command = "uv"
args = ["run", "mcp-server.py"]
"#,
    );

    let config = AppConfig::load(Some(&path)).expect("config loads");
    assert_eq!(config.thread_id, "ops-thread");
    assert_eq!(config.recursion_limit, 10);
    assert_eq!(config.model.deployment, "gpt-4o");
    assert_eq!(config.model.max_retries, 1);
    assert_eq!(config.model.temperature, 0.2);
    assert_eq!(config.server.command, PathBuf::from("uv"));
    assert_eq!(config.server.args, vec!["run", "mcp-server.py"]);
    assert!(config.system_prompt.starts_with("You are a MongoDB assistant."));
}

#[test]
#[serial]
fn credentials_come_from_environment() {
    clear_azure_env();
    // SAFETY: serialized with every other environment test.
    unsafe {
        std::env::set_var("AZURE_ENDPOINT_EUS", "https://eus.example.azure.com");
        std::env::set_var("AZURE_OPENAI_API_KEY_EUS", "secret");
        std::env::set_var("AZURE_OPENAI_API_VERSION", "2024-06-01");
    }
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "");

    let config = AppConfig::load(Some(&path)).expect("config loads");
    clear_azure_env();

    assert_eq!(
        config.model.endpoint.as_deref(),
        Some("https://eus.example.azure.com")
    );
    assert_eq!(config.model.api_key.as_deref(), Some("secret"));
    assert_eq!(config.model.api_version.as_deref(), Some("2024-06-01"));
}

#[test]
#[serial]
fn missing_credentials_are_not_a_config_error() {
    clear_azure_env();
    let dir = tempdir().expect("tempdir");
    let path = write_config(dir.path(), "");

    let config = AppConfig::load(Some(&path)).expect("config loads");
    assert!(config.model.endpoint.is_none());
    assert!(config.model.api_key.is_none());
}
