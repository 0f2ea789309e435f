//! Integration tests for configuration management
//!
//! These tests verify that the Config struct can be loaded from disk,
//! validated, and filled with defaults for omitted sections.

use std::fs;
use tempfile::TempDir;

use herald_engine::config::Config;
use sdk::errors::HeraldError;
use sdk::types::{Channel, Tone};

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

fn assert_config_error(result: Result<Config, HeraldError>, needle: &str) {
    match result {
        Err(HeraldError::Config(msg)) => assert!(msg.contains(needle), "got: {}", msg),
        Err(other) => panic!("expected config error, got {:?}", other),
        Ok(_) => panic!("expected config error containing '{}'", needle),
    }
}

#[test]
fn test_config_toml_parsing() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[core]
log_level = "debug"

[llm]
provider = "ollama"
timeout_secs = 45
max_tokens_cap = 800

[llm.ollama]
base_url = "http://localhost:11434"
model = "llama3.1:8b"

[scheduler]
default_topics = ["sleep hygiene", "gratitude"]
publish_timeout_secs = 10

[[agents]]
id = "twitter-main"
name = "Daily calm"
channel = "twitter"
learning_rate = 0.5
target_audience = ["busy parents"]

[agents.personality]
tone = "playful"
style = "short and warm"

[agents.posting_frequency]
min_hours = 6.0
max_hours = 24.0
preferred_times = [9, 18]

[[agents]]
id = "newsletter"
channel = "email"
enabled = false
"#,
    );

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.core.log_level, "debug");
    assert_eq!(config.llm.provider, "ollama");
    assert_eq!(config.llm.timeout_secs, 45);
    assert_eq!(config.llm.max_tokens_cap, 800);
    assert_eq!(config.llm.ollama.model, "llama3.1:8b");
    assert_eq!(
        config.scheduler.default_topics,
        vec!["sleep hygiene", "gratitude"]
    );
    assert_eq!(config.scheduler.publish_timeout_secs, 10);

    assert_eq!(config.agents.len(), 2);
    let twitter = &config.agents[0];
    assert_eq!(twitter.channel, Channel::Twitter);
    assert_eq!(twitter.personality.tone, Tone::Playful);
    assert_eq!(twitter.posting_frequency.preferred_times, vec![9, 18]);
    assert_eq!(twitter.target_audience, vec!["busy parents"]);

    let email = &config.agents[1];
    assert!(!email.enabled);
    assert_eq!(email.posting_frequency.min_hours, 4.0);
    assert_eq!(email.personality.tone, Tone::Inspirational);
}

#[test]
fn test_minimal_config_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "");

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.core.log_level, "info");
    assert_eq!(config.llm.provider, "openai");
    assert_eq!(config.agents.len(), Channel::ALL.len());
    assert!(!config.scheduler.default_topics.is_empty());
}

#[test]
fn test_default_config_written_to_disk_reloads() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let toml_string = toml::to_string_pretty(&Config::default()).unwrap();
    fs::write(&path, toml_string).unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.agents, Config::default().agents);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let result = Config::load_from_path(&dir.path().join("absent.toml"));
    assert_config_error(result, "Failed to read config file");
}

#[test]
fn test_malformed_toml_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[core\nlog_level = ");
    assert_config_error(Config::load_from_path(&path), "Failed to parse config");
}

#[test]
fn test_invalid_log_level_detection() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[core]\nlog_level = \"verbose\"\n");
    assert_config_error(Config::load_from_path(&path), "Invalid log level");
}

#[test]
fn test_invalid_provider_detection() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[llm]\nprovider = \"anthropic\"\n");
    assert_config_error(Config::load_from_path(&path), "Invalid provider");
}

#[test]
fn test_unknown_channel_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[[agents]]\nid = \"myspace-1\"\nchannel = \"myspace\"\n");
    assert_config_error(Config::load_from_path(&path), "Failed to parse config");
}

#[test]
fn test_posting_window_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[agents]]
id = "blog-main"
channel = "blog"

[agents.posting_frequency]
min_hours = 48.0
max_hours = 24.0
"#,
    );
    assert_config_error(Config::load_from_path(&path), "posting window");
}

#[test]
fn test_nan_posting_window_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[agents]]
id = "twitter-main"
channel = "twitter"

[agents.posting_frequency]
min_hours = nan
max_hours = 12.0
"#,
    );
    assert_config_error(Config::load_from_path(&path), "finite");
}

#[test]
fn test_preferred_hour_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[agents]]
id = "tiktok-main"
channel = "tiktok"

[agents.posting_frequency]
preferred_times = [12, 24]
"#,
    );
    assert_config_error(Config::load_from_path(&path), "preferred hour 24");
}

#[test]
fn test_learning_rate_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[[agents]]\nid = \"reddit-main\"\nchannel = \"reddit\"\nlearning_rate = 1.5\n",
    );
    assert_config_error(Config::load_from_path(&path), "learning_rate");
}

#[test]
fn test_duplicate_agent_ids_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[[agents]]
id = "main"
channel = "twitter"

[[agents]]
id = "main"
channel = "reddit"
"#,
    );
    assert_config_error(Config::load_from_path(&path), "Duplicate agent id 'main'");
}

#[test]
fn test_token_cap_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[llm]\nmax_tokens_cap = 10\n");
    assert_config_error(Config::load_from_path(&path), "max_tokens_cap");
}
