//! Channel Agents
//!
//! An `Agent` is a configured, channel-bound actor. The per-channel parts
//! (length and hashtag rules, publishing, metrics, scoring) live behind the
//! `ChannelAdapter` trait; everything shared lives on `Agent`:
//!
//! 1. Generate content through the `ContentGenerator`
//! 2. Publish it through the adapter, under a timeout
//! 3. Measure it through the adapter and score it
//! 4. Record the outcome in memory and fold learnings back into the config
//!
//! Generation and publish failures never escape: they become failed actions.

pub mod learning;
pub mod schedule;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::content::{ContentGenerator, ContentRequest, GeneratedContent};
use crate::memory::MemoryStore;
use sdk::errors::{HeraldError, Result};
use sdk::types::{
    ActionKind, AgentAction, AgentConfig, AgentLearnings, AgentPerformance, Channel, FailureKind,
    Metadata, MetricsSource, PerformanceMetrics,
};

pub use learning::{apply_learnings, ConfigUpdate};
pub use schedule::Eligibility;

/// Scores above this reinforce the action's keywords
pub const REINFORCE_THRESHOLD: f64 = 70.0;

/// Scores below this trigger the avoid hook
pub const AVOID_THRESHOLD: f64 = 30.0;

/// Default timeout for publish and metrics calls
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 20;

/// Content rules a channel layers on top of the agent's personality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConstraints {
    /// Maximum length in characters
    pub max_length: usize,
    pub include_hashtags: bool,
    pub include_cta: bool,
}

/// Result of a publish call
#[derive(Debug, Clone, PartialEq)]
pub enum PublishOutcome {
    /// The channel accepted the content
    Published { remote_id: String, metadata: Metadata },
    /// The channel rejected the content or the call errored
    Failed(String),
    /// The channel has no live integration yet
    NotIntegrated,
}

/// Result of a metrics fetch
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsOutcome {
    Measured(PerformanceMetrics),
    Failed(String),
    NotIntegrated,
}

/// Per-channel capability set
#[async_trait]
pub trait ChannelAdapter: Send + Sync {
    fn channel(&self) -> Channel;

    /// Kind of action a publish produces
    fn action_kind(&self) -> ActionKind {
        ActionKind::Post
    }

    fn constraints(&self) -> ChannelConstraints;

    /// Publish content with its metadata
    async fn publish(&self, content: &str, metadata: &Metadata) -> PublishOutcome;

    /// Fetch engagement metrics for a published item
    async fn fetch_metrics(&self, remote_id: &str) -> MetricsOutcome;

    /// Weighted 0-100 score for this channel's metrics
    fn score(&self, metrics: &PerformanceMetrics) -> f64;
}

/// Content request in an agent's voice under its channel's constraints.
pub fn build_content_request(
    config: &AgentConfig,
    constraints: ChannelConstraints,
    topic: &str,
    context: Option<&str>,
) -> ContentRequest {
    let style = config.personality.style.trim();

    let mut request = ContentRequest::new(config.channel, topic, constraints.max_length);
    request.tone = Some(config.personality.tone);
    request.style = (!style.is_empty()).then(|| style.to_string());
    request.audience = config.target_audience.clone();
    request.include_hashtags = constraints.include_hashtags;
    request.include_cta = constraints.include_cta;
    request.context = context.map(String::from);
    request
}

/// A channel-bound content agent
pub struct Agent {
    id: String,
    config: RwLock<AgentConfig>,
    adapter: Box<dyn ChannelAdapter>,
    content: Arc<ContentGenerator>,
    memory: Arc<dyn MemoryStore>,
    io_timeout: Duration,
}

impl Agent {
    /// Create an agent.
    ///
    /// Fails if the adapter serves a different channel than the config names.
    pub fn new(
        config: AgentConfig,
        adapter: Box<dyn ChannelAdapter>,
        content: Arc<ContentGenerator>,
        memory: Arc<dyn MemoryStore>,
    ) -> Result<Self> {
        if adapter.channel() != config.channel {
            return Err(HeraldError::Config(format!(
                "agent {} is configured for {} but its adapter serves {}",
                config.id,
                config.channel,
                adapter.channel()
            )));
        }

        Ok(Self {
            id: config.id.clone(),
            config: RwLock::new(config),
            adapter,
            content,
            memory,
            io_timeout: Duration::from_secs(DEFAULT_IO_TIMEOUT_SECS),
        })
    }

    /// Override the publish / metrics timeout
    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn channel(&self) -> Channel {
        self.adapter.channel()
    }

    /// Snapshot of the current config
    pub async fn config(&self) -> AgentConfig {
        self.config.read().await.clone()
    }

    pub async fn is_enabled(&self) -> bool {
        self.config.read().await.enabled
    }

    /// Build the content request for a topic from config and channel rules
    async fn content_request(&self, topic: &str, context: Option<&str>) -> ContentRequest {
        let config = self.config.read().await;
        build_content_request(&config, self.adapter.constraints(), topic, context)
    }

    /// Generate content for a topic in this agent's voice.
    pub async fn generate_content(
        &self,
        topic: &str,
        context: Option<&str>,
    ) -> Result<GeneratedContent> {
        let request = self.content_request(topic, context).await;
        self.content.generate(&request).await
    }

    /// Publish content and return the resulting action.
    ///
    /// Never fails: rejected, errored, timed-out and not-yet-integrated
    /// publishes all come back as failed actions.
    pub async fn post_content(&self, content: &str, metadata: Metadata) -> AgentAction {
        let mut action = AgentAction::pending(
            &self.id,
            self.adapter.action_kind(),
            self.channel(),
            content,
            metadata,
        );

        match timeout(
            self.io_timeout,
            self.adapter.publish(content, &action.metadata),
        )
        .await
        {
            Ok(PublishOutcome::Published {
                remote_id,
                metadata,
            }) => {
                info!(
                    "Agent {} posted action {} ({})",
                    self.id, action.id, remote_id
                );
                action.mark_posted(remote_id, metadata);
            }
            Ok(PublishOutcome::Failed(reason)) => {
                warn!("Agent {} publish failed: {}", self.id, reason);
                action.mark_failed(FailureKind::Publish, reason);
            }
            Ok(PublishOutcome::NotIntegrated) => {
                info!(
                    "Agent {}: {} integration not available, action {} not published",
                    self.id,
                    self.channel(),
                    action.id
                );
                action.mark_failed(
                    FailureKind::NotIntegrated,
                    format!("{} integration not yet implemented", self.channel()),
                );
            }
            Err(_) => {
                warn!(
                    "Agent {} publish timed out after {}s",
                    self.id,
                    self.io_timeout.as_secs()
                );
                action.mark_failed(
                    FailureKind::Publish,
                    format!("publish timed out after {}s", self.io_timeout.as_secs()),
                );
            }
        }

        action
    }

    /// Generate and publish content for a topic.
    ///
    /// A generation failure yields a failed action with empty content.
    pub async fn run(&self, topic: &str) -> AgentAction {
        self.run_with_context(topic, None).await
    }

    /// `run` with extra context for the prompt
    pub async fn run_with_context(&self, topic: &str, context: Option<&str>) -> AgentAction {
        let tone = self.config.read().await.personality.tone;

        let mut metadata = Metadata::new();
        metadata.insert("topic".to_string(), json!(topic));
        metadata.insert("tone".to_string(), json!(tone.as_str()));

        match self.generate_content(topic, context).await {
            Ok(generated) => {
                let meta = &generated.metadata;
                metadata.insert("hashtags".to_string(), json!(meta.hashtags));
                metadata.insert("keywords".to_string(), json!(meta.keywords));
                metadata.insert(
                    "estimated_engagement".to_string(),
                    json!(meta.estimated_engagement),
                );
                metadata.insert("provider".to_string(), json!(self.content.provider_name()));
                if let Some(model) = &meta.model {
                    metadata.insert("model".to_string(), json!(model));
                }
                self.post_content(&generated.content, metadata).await
            }
            Err(e) => {
                warn!("Agent {} could not generate content: {}", self.id, e);
                let mut action = AgentAction::pending(
                    &self.id,
                    self.adapter.action_kind(),
                    self.channel(),
                    "",
                    metadata,
                );
                action.mark_failed(FailureKind::Generation, e.to_string());
                action
            }
        }
    }

    /// Measure a recorded action and score it.
    ///
    /// Actions that were never posted, and channels without a live
    /// integration, yield zero-score performances. A failed fetch is an error.
    pub async fn track_performance(&self, action_id: &str) -> Result<AgentPerformance> {
        let action = self
            .memory
            .action(&self.id, action_id)
            .await
            .ok_or_else(|| HeraldError::ActionNotFound(action_id.to_string()))?;

        let Some(remote_id) = action.remote_id.as_deref().filter(|_| action.is_posted()) else {
            debug!(
                "Action {} was not posted; nothing to measure",
                action_id
            );
            return Ok(AgentPerformance::zero(
                &self.id,
                action_id,
                MetricsSource::Unavailable,
            ));
        };

        match timeout(self.io_timeout, self.adapter.fetch_metrics(remote_id)).await {
            Ok(MetricsOutcome::Measured(metrics)) => {
                let score = self.adapter.score(&metrics);
                debug!("Action {} scored {:.1}", action_id, score);
                Ok(AgentPerformance::measured(
                    &self.id, action_id, metrics, score,
                ))
            }
            Ok(MetricsOutcome::NotIntegrated) => Ok(AgentPerformance::zero(
                &self.id,
                action_id,
                MetricsSource::NotIntegrated,
            )),
            Ok(MetricsOutcome::Failed(reason)) => Err(HeraldError::Measurement(reason)),
            Err(_) => Err(HeraldError::Measurement(format!(
                "metrics fetch timed out after {}s",
                self.io_timeout.as_secs()
            ))),
        }
    }

    /// Record a performance and adapt the config from the new learnings.
    ///
    /// Scores above 70 reinforce the action's keywords; scores below 30 go
    /// through the avoid hook.
    pub async fn learn_from_performance(
        &self,
        performance: &AgentPerformance,
    ) -> Result<AgentLearnings> {
        let mut learnings = self.memory.record_performance(performance.clone()).await?;

        if performance.score > REINFORCE_THRESHOLD {
            learnings = self
                .memory
                .reinforce_pattern(&self.id, &performance.action_id)
                .await?;
        } else if performance.score < AVOID_THRESHOLD {
            learnings = self
                .memory
                .avoid_pattern(&self.id, &performance.action_id)
                .await?;
        }

        let update = {
            let mut config = self.config.write().await;
            apply_learnings(&mut config, &learnings, learnings.total_actions)
        };

        if update.any() {
            info!(
                "Agent {} adapted config (tone changed: {}, preferred times changed: {})",
                self.id, update.tone_changed, update.preferred_times_changed
            );
        }
        debug!(
            "Agent {} learnings: {} measured, average {:.1}",
            self.id, learnings.total_actions, learnings.average_score
        );

        Ok(learnings)
    }

    /// Scheduling policy evaluated at `now`
    pub async fn eligibility_at(&self, now: DateTime<Utc>) -> Eligibility {
        let last = self.memory.last_action(&self.id).await;
        let config = self.config.read().await;
        schedule::evaluate(&config, last.as_ref(), now)
    }

    pub async fn should_post_now(&self) -> bool {
        self.eligibility_at(Utc::now()).await.is_eligible()
    }

    /// True if the last action is older than `max_hours` at `now`
    pub async fn is_overdue_at(&self, now: DateTime<Utc>) -> bool {
        let last = self.memory.last_action(&self.id).await;
        let config = self.config.read().await;
        schedule::is_overdue(&config, last.as_ref(), now)
    }
}
