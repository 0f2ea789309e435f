//! Configuration management
//!
//! This module handles loading, validation, and management of the Herald configuration.
//! Configuration is stored in TOML format at ~/.herald/config.toml.
//!
//! # Configuration Sections
//!
//! - **core**: Log level
//! - **llm**: Text generation provider, per-call timeout, token budget cap
//! - **scheduler**: Default topics and channel call timeout
//! - **agents**: One table per posting agent (channel, tone, posting window, audience)
//!
//! API keys are never stored in the file. The OpenAI provider reads its key
//! from the environment variable named by `llm.openai.api_key_env`.
//!
//! # Examples
//!
//! ```no_run
//! use herald_engine::config::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load_or_create()?;
//!
//! println!("Provider: {}", config.llm.provider);
//! println!("Agents: {}", config.agents.len());
//! # Ok(())
//! # }
//! ```

use sdk::errors::HeraldError;
use sdk::types::{AgentConfig, Channel, Personality, PostingFrequency, Tone};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Smallest token budget cap accepted by validation
pub const MIN_TOKENS_CAP: u32 = 64;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Text generation provider configuration
    #[serde(default)]
    pub llm: LLMConfig,

    /// Scheduled-run settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Posting agents; one per channel when omitted
    #[serde(default = "default_agents")]
    pub agents: Vec<AgentConfig>,
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Text generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMConfig {
    /// Provider used for content generation (openai, ollama)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Timeout for each completion call in seconds
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,

    /// Upper bound of the token budget derived from a request's max length
    #[serde(default = "default_max_tokens_cap")]
    pub max_tokens_cap: u32,

    /// OpenAI-compatible provider settings
    #[serde(default)]
    pub openai: OpenAIConfig,

    /// Ollama provider settings
    #[serde(default)]
    pub ollama: OllamaConfig,
}

/// OpenAI provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// Base URL for the chat-completions API
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_openai_key_env")]
    pub api_key_env: String,
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL for Ollama API
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,

    /// Model name
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

/// Scheduled-run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Topics used when a scheduled run is triggered without any
    #[serde(default = "default_topics")]
    pub default_topics: Vec<String>,

    /// Timeout for each publish or metrics call in seconds
    #[serde(default = "default_publish_timeout")]
    pub publish_timeout_secs: u64,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_max_tokens_cap() -> u32 {
    1000
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_ollama_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.1:8b".to_string()
}

fn default_publish_timeout() -> u64 {
    20
}

fn default_topics() -> Vec<String> {
    [
        "morning gratitude practice",
        "manifesting with clear intention",
        "breathwork for anxious moments",
        "evening reflection ritual",
        "building an abundance mindset",
        "visualization before sleep",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_agent(
    channel: Channel,
    tone: Tone,
    style: &str,
    min_hours: f64,
    max_hours: f64,
    preferred_times: &[u32],
) -> AgentConfig {
    let mut config = AgentConfig::new(format!("{}-main", channel), channel);
    config.name = match channel {
        Channel::Twitter => "Twitter",
        Channel::Reddit => "Reddit",
        Channel::Blog => "Blog",
        Channel::Email => "Newsletter",
        Channel::TikTok => "TikTok",
        Channel::Instagram => "Instagram",
    }
    .to_string();
    config.target_audience = vec![
        "people starting a meditation habit".to_string(),
        "manifestation practitioners".to_string(),
    ];
    config.personality = Personality {
        tone,
        style: style.to_string(),
    };
    config.posting_frequency = PostingFrequency {
        min_hours,
        max_hours,
        preferred_times: preferred_times.to_vec(),
    };
    config
}

fn default_agents() -> Vec<AgentConfig> {
    vec![
        default_agent(
            Channel::Twitter,
            Tone::Inspirational,
            "warm, concise, one idea per post",
            4.0,
            12.0,
            &[9, 13, 19],
        ),
        default_agent(
            Channel::Reddit,
            Tone::Conversational,
            "helpful peer sharing what worked, never salesy",
            24.0,
            72.0,
            &[],
        ),
        default_agent(
            Channel::Blog,
            Tone::Educational,
            "grounded, practical, cites simple exercises",
            72.0,
            168.0,
            &[],
        ),
        default_agent(
            Channel::Email,
            Tone::Inspirational,
            "personal letter from the founder",
            168.0,
            336.0,
            &[8],
        ),
        default_agent(
            Channel::TikTok,
            Tone::Playful,
            "hook in the first line, short and rhythmic",
            8.0,
            24.0,
            &[12, 18, 21],
        ),
        default_agent(
            Channel::Instagram,
            Tone::Inspirational,
            "story first, gentle line breaks",
            12.0,
            36.0,
            &[8, 12, 19],
        ),
    ]
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            timeout_secs: default_llm_timeout(),
            max_tokens_cap: default_max_tokens_cap(),
            openai: OpenAIConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            api_key_env: default_openai_key_env(),
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_topics: default_topics(),
            publish_timeout_secs: default_publish_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            core: CoreConfig::default(),
            llm: LLMConfig::default(),
            scheduler: SchedulerConfig::default(),
            agents: default_agents(),
        }
    }
}

impl Config {
    /// Load configuration from the default location (~/.herald/config.toml)
    ///
    /// If the configuration file doesn't exist, creates a default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration file cannot be read or written
    /// - TOML parsing fails
    /// - Validation fails
    pub fn load_or_create() -> Result<Self, HeraldError> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            Self::create_default(&config_path)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, HeraldError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| HeraldError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| HeraldError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Create default configuration and save to path
    fn create_default(path: &Path) -> Result<Self, HeraldError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                HeraldError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let config = Self::default();
        config.validate()?;

        let toml_string = toml::to_string_pretty(&config)
            .map_err(|e| HeraldError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| HeraldError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(config)
    }

    /// Get the default configuration file path (~/.herald/config.toml)
    pub fn default_config_path() -> Result<PathBuf, HeraldError> {
        let home = dirs::home_dir()
            .ok_or_else(|| HeraldError::Config("Could not determine home directory".to_string()))?;

        Ok(home.join(".herald").join("config.toml"))
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `HeraldError::Config` describing the first invalid value.
    pub fn validate(&self) -> Result<(), HeraldError> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.core.log_level.as_str()) {
            return Err(HeraldError::Config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.core.log_level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_providers = ["openai", "ollama"];
        if !valid_providers.contains(&self.llm.provider.as_str()) {
            return Err(HeraldError::Config(format!(
                "Invalid provider '{}'. Must be one of: {}",
                self.llm.provider,
                valid_providers.join(", ")
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(HeraldError::Config(
                "llm.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens_cap < MIN_TOKENS_CAP {
            return Err(HeraldError::Config(format!(
                "llm.max_tokens_cap must be at least {}",
                MIN_TOKENS_CAP
            )));
        }

        if self.scheduler.publish_timeout_secs == 0 {
            return Err(HeraldError::Config(
                "scheduler.publish_timeout_secs must be greater than 0".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for agent in &self.agents {
            validate_agent(agent)?;
            if !seen.insert(agent.id.as_str()) {
                return Err(HeraldError::Config(format!(
                    "Duplicate agent id '{}'",
                    agent.id
                )));
            }
        }

        Ok(())
    }
}

fn validate_agent(agent: &AgentConfig) -> Result<(), HeraldError> {
    if agent.id.trim().is_empty() {
        return Err(HeraldError::Config("Agent id must not be empty".to_string()));
    }

    if !(0.0..=1.0).contains(&agent.learning_rate) {
        return Err(HeraldError::Config(format!(
            "Agent '{}': learning_rate must be between 0.0 and 1.0",
            agent.id
        )));
    }

    let window = &agent.posting_frequency;
    if !window.min_hours.is_finite() || !window.max_hours.is_finite() {
        return Err(HeraldError::Config(format!(
            "Agent '{}': posting window hours must be finite numbers",
            agent.id
        )));
    }
    if window.min_hours < 0.0 || window.min_hours > window.max_hours {
        return Err(HeraldError::Config(format!(
            "Agent '{}': posting window must satisfy 0 <= min_hours <= max_hours",
            agent.id
        )));
    }

    if let Some(hour) = window.preferred_times.iter().find(|h| **h >= 24) {
        return Err(HeraldError::Config(format!(
            "Agent '{}': preferred hour {} is not an hour of the day",
            agent.id, hour
        )));
    }

    Ok(())
}
