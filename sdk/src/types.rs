//! Agent, action, performance and learnings types
//!
//! Everything here is JSON-serializable so the engine's reports can be handed
//! straight to a request layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Free-form metadata attached to actions and generated content
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// A content-publishing surface with its own style rules and metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Short-form social feed
    Twitter,
    /// Community forum
    Reddit,
    /// Long-form article
    Blog,
    /// Newsletter email
    Email,
    /// Short-video caption
    TikTok,
    /// Visual-feed caption
    Instagram,
}

impl Channel {
    /// Every supported channel, in display order
    pub const ALL: [Channel; 6] = [
        Channel::Twitter,
        Channel::Reddit,
        Channel::Blog,
        Channel::Email,
        Channel::TikTok,
        Channel::Instagram,
    ];

    /// Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Twitter => "twitter",
            Channel::Reddit => "reddit",
            Channel::Blog => "blog",
            Channel::Email => "email",
            Channel::TikTok => "tiktok",
            Channel::Instagram => "instagram",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| {
                format!(
                    "Unknown channel '{}'. Must be one of: {}",
                    s,
                    Channel::ALL.map(|c| c.as_str()).join(", ")
                )
            })
    }
}

/// Voice an agent writes in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Inspirational,
    Educational,
    Conversational,
    Professional,
    Casual,
    Playful,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Inspirational => "inspirational",
            Tone::Educational => "educational",
            Tone::Conversational => "conversational",
            Tone::Professional => "professional",
            Tone::Casual => "casual",
            Tone::Playful => "playful",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inspirational" => Ok(Tone::Inspirational),
            "educational" => Ok(Tone::Educational),
            "conversational" => Ok(Tone::Conversational),
            "professional" => Ok(Tone::Professional),
            "casual" => Ok(Tone::Casual),
            "playful" => Ok(Tone::Playful),
            other => Err(format!("Unknown tone '{}'", other)),
        }
    }
}

/// Tone and free-text style of an agent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Personality {
    #[serde(default)]
    pub tone: Tone,

    /// Free-text style guidance appended to the prompt
    #[serde(default)]
    pub style: String,
}

/// Posting window of an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingFrequency {
    /// Minimum hours between two posts
    #[serde(default = "default_min_hours")]
    pub min_hours: f64,

    /// Hours after which the agent is considered overdue
    #[serde(default = "default_max_hours")]
    pub max_hours: f64,

    /// UTC hours-of-day (0-23) the agent may post in; empty means any hour
    #[serde(default)]
    pub preferred_times: Vec<u32>,
}

impl Default for PostingFrequency {
    fn default() -> Self {
        Self {
            min_hours: default_min_hours(),
            max_hours: default_max_hours(),
            preferred_times: Vec::new(),
        }
    }
}

/// Static and mutable policy for one agent
///
/// `personality.tone` and `posting_frequency.preferred_times` may be
/// overwritten by the learning loop; everything else is fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Unique identity within the orchestrator; partitions all memory records
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    pub channel: Channel,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Target-audience descriptors
    #[serde(default)]
    pub target_audience: Vec<String>,

    /// How quickly measured outcomes may change this config (0.0-1.0)
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    #[serde(default)]
    pub personality: Personality,

    #[serde(default)]
    pub posting_frequency: PostingFrequency,
}

impl AgentConfig {
    /// Create an enabled config with default policy for a channel
    pub fn new(id: impl Into<String>, channel: Channel) -> Self {
        Self {
            id: id.into(),
            name: channel.as_str().to_string(),
            channel,
            enabled: true,
            target_audience: Vec::new(),
            learning_rate: default_learning_rate(),
            personality: Personality::default(),
            posting_frequency: PostingFrequency::default(),
        }
    }
}

/// Kind of action an agent takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Post,
    Reply,
    Comment,
    Email,
    Schedule,
}

/// Lifecycle state of an action; transitions once from `Pending`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Pending,
    Posted,
    Failed,
}

/// Why an action failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Text generation errored, timed out or returned nothing
    Generation,
    /// The channel rejected the content or the call errored
    Publish,
    /// The channel has no live integration yet
    NotIntegrated,
}

/// Typed failure carried by a failed action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// One attempt by an agent to publish content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAction {
    pub id: String,
    pub agent_id: String,
    pub kind: ActionKind,
    pub channel: Channel,
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
    pub timestamp: DateTime<Utc>,
    pub status: ActionStatus,

    /// Identifier assigned by the channel once posted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ActionFailure>,
}

impl AgentAction {
    /// Create a pending action stamped with the current time
    pub fn pending(
        agent_id: impl Into<String>,
        kind: ActionKind,
        channel: Channel,
        content: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            agent_id: agent_id.into(),
            kind,
            channel,
            content: content.into(),
            metadata,
            timestamp: Utc::now(),
            status: ActionStatus::Pending,
            remote_id: None,
            failure: None,
        }
    }

    /// Override the timestamp (imports and replays)
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Mark the action posted. Returns false if it already left `Pending`.
    pub fn mark_posted(&mut self, remote_id: impl Into<String>, extra: Metadata) -> bool {
        if self.status != ActionStatus::Pending {
            return false;
        }
        let remote_id = remote_id.into();
        self.metadata.extend(extra);
        self.metadata.insert(
            "remote_id".to_string(),
            serde_json::Value::String(remote_id.clone()),
        );
        self.remote_id = Some(remote_id);
        self.status = ActionStatus::Posted;
        true
    }

    /// Mark the action failed. Returns false if it already left `Pending`.
    pub fn mark_failed(&mut self, kind: FailureKind, message: impl Into<String>) -> bool {
        if self.status != ActionStatus::Pending {
            return false;
        }
        let message = message.into();
        self.metadata.insert(
            "error".to_string(),
            serde_json::Value::String(message.clone()),
        );
        self.failure = Some(ActionFailure { kind, message });
        self.status = ActionStatus::Failed;
        true
    }

    pub fn is_posted(&self) -> bool {
        self.status == ActionStatus::Posted
    }

    /// Tone recorded at generation time, if any
    pub fn tone(&self) -> Option<Tone> {
        self.metadata
            .get("tone")
            .and_then(|v| v.as_str())
            .and_then(|s| s.parse().ok())
    }
}

/// Channel engagement counts; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clicks: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reach: Option<u64>,
}

impl PerformanceMetrics {
    /// Likes + shares + comments, saturating at `u64::MAX`
    pub fn interactions(&self) -> u64 {
        self.likes
            .unwrap_or(0)
            .saturating_add(self.shares.unwrap_or(0))
            .saturating_add(self.comments.unwrap_or(0))
    }
}

/// Where a performance record's metrics came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsSource {
    /// Reported by the channel
    Measured,
    /// The channel has no live integration yet
    NotIntegrated,
    /// The fetch failed or the action was never posted
    Unavailable,
}

/// A measured outcome for one action; append-only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentPerformance {
    pub agent_id: String,
    pub action_id: String,
    pub metrics: PerformanceMetrics,
    pub timestamp: DateTime<Utc>,

    /// 0-100
    pub score: f64,

    pub source: MetricsSource,
}

impl AgentPerformance {
    /// Performance built from channel metrics; the score is clamped to 0-100
    pub fn measured(
        agent_id: impl Into<String>,
        action_id: impl Into<String>,
        metrics: PerformanceMetrics,
        score: f64,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            action_id: action_id.into(),
            metrics,
            timestamp: Utc::now(),
            score: clamp_score(score),
            source: MetricsSource::Measured,
        }
    }

    /// Zero-score performance used when nothing could be measured
    pub fn zero(
        agent_id: impl Into<String>,
        action_id: impl Into<String>,
        source: MetricsSource,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            action_id: action_id.into(),
            metrics: PerformanceMetrics::default(),
            timestamp: Utc::now(),
            score: 0.0,
            source,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Derived, non-authoritative summary of an agent's history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentLearnings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_tone: Option<Tone>,

    pub best_performing_topics: Vec<String>,

    /// UTC hours whose mean score exceeds 60, ascending
    pub optimal_posting_times: Vec<u32>,

    pub average_score: f64,

    pub total_actions: usize,

    /// Performances scoring above 50
    pub successful_actions: usize,
}

impl AgentLearnings {
    /// Share of successful performances, 0-100
    pub fn success_rate(&self) -> f64 {
        if self.total_actions == 0 {
            0.0
        } else {
            self.successful_actions as f64 / self.total_actions as f64 * 100.0
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_min_hours() -> f64 {
    4.0
}

fn default_max_hours() -> f64 {
    24.0
}

fn default_learning_rate() -> f64 {
    0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action() -> AgentAction {
        AgentAction::pending(
            "agent-1",
            ActionKind::Post,
            Channel::Twitter,
            "hello",
            Metadata::new(),
        )
    }

    #[test]
    fn test_channel_parse() {
        assert_eq!("TikTok".parse::<Channel>().unwrap(), Channel::TikTok);
        assert_eq!(" email ".parse::<Channel>().unwrap(), Channel::Email);
        assert!("myspace".parse::<Channel>().is_err());
    }

    #[test]
    fn test_channel_serializes_lowercase() {
        let json = serde_json::to_string(&Channel::TikTok).unwrap();
        assert_eq!(json, r#""tiktok""#);
    }

    #[test]
    fn test_action_transitions_once() {
        let mut a = action();
        assert_eq!(a.status, ActionStatus::Pending);

        assert!(a.mark_posted("remote-1", Metadata::new()));
        assert_eq!(a.status, ActionStatus::Posted);
        assert_eq!(a.remote_id.as_deref(), Some("remote-1"));

        assert!(!a.mark_failed(FailureKind::Publish, "late failure"));
        assert_eq!(a.status, ActionStatus::Posted);
        assert!(a.failure.is_none());
    }

    #[test]
    fn test_mark_failed_records_error_metadata() {
        let mut a = action();
        assert!(a.mark_failed(FailureKind::NotIntegrated, "twitter integration pending"));
        assert_eq!(a.status, ActionStatus::Failed);
        assert_eq!(
            a.metadata.get("error").and_then(|v| v.as_str()),
            Some("twitter integration pending")
        );
        assert_eq!(a.failure.unwrap().kind, FailureKind::NotIntegrated);
    }

    #[test]
    fn test_action_tone_from_metadata() {
        let mut meta = Metadata::new();
        meta.insert("tone".to_string(), serde_json::json!("playful"));
        let a = AgentAction::pending("a", ActionKind::Post, Channel::Reddit, "x", meta);
        assert_eq!(a.tone(), Some(Tone::Playful));
        assert_eq!(action().tone(), None);
    }

    #[test]
    fn test_performance_score_clamped() {
        let p = AgentPerformance::measured("a", "b", PerformanceMetrics::default(), 140.0);
        assert_eq!(p.score, 100.0);
        let p = AgentPerformance::measured("a", "b", PerformanceMetrics::default(), f64::NAN);
        assert_eq!(p.score, 0.0);
    }

    #[test]
    fn test_agent_config_defaults_from_toml_like_json() {
        let config: AgentConfig =
            serde_json::from_str(r#"{"id": "reddit-1", "channel": "reddit"}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.posting_frequency.min_hours, 4.0);
        assert!(config.posting_frequency.preferred_times.is_empty());
        assert_eq!(config.learning_rate, 0.3);
    }

    #[test]
    fn test_interactions_saturate() {
        let metrics = PerformanceMetrics {
            likes: Some(u64::MAX),
            shares: Some(1),
            comments: Some(7),
            ..Default::default()
        };
        assert_eq!(metrics.interactions(), u64::MAX);

        let metrics = PerformanceMetrics {
            likes: Some(3),
            comments: Some(4),
            ..Default::default()
        };
        assert_eq!(metrics.interactions(), 7);
    }

    #[test]
    fn test_success_rate() {
        let learnings = AgentLearnings {
            total_actions: 4,
            successful_actions: 1,
            ..Default::default()
        };
        assert_eq!(learnings.success_rate(), 25.0);
        assert_eq!(AgentLearnings::default().success_rate(), 0.0);
    }
}
