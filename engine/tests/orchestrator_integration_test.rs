//! End-to-end tests for the orchestrator
//!
//! Uses an in-test text generator and a scriptable channel adapter so the
//! whole run -> record -> measure -> learn cycle can be checked without any
//! network access.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

use herald_engine::agent::{
    Agent, ChannelAdapter, ChannelConstraints, Eligibility, MetricsOutcome, PublishOutcome,
};
use herald_engine::channels::adapter_for;
use herald_engine::config::Config;
use herald_engine::content::ContentGenerator;
use herald_engine::llm::{Completion, CompletionRequest, LLMError, TextGenerator};
use herald_engine::memory::{InMemoryStore, MemoryStore};
use herald_engine::orchestrator::Orchestrator;
use sdk::types::{
    ActionStatus, AgentAction, AgentConfig, Channel, FailureKind, Metadata, MetricsSource,
    PerformanceMetrics,
};

/// Writes a fixed sentence about whatever topic it is asked for
struct TopicWriter;

#[async_trait]
impl TextGenerator for TopicWriter {
    fn name(&self) -> &str {
        "topic-writer"
    }

    async fn complete(&self, request: &CompletionRequest) -> herald_engine::llm::Result<Completion> {
        let topic = request
            .user
            .lines()
            .next()
            .and_then(|l| l.split("about: ").nth(1))
            .unwrap_or("stillness");
        Ok(Completion {
            text: format!("Gratitude rituals transform {} for everyone", topic),
            model: None,
        })
    }
}

/// Fails every completion
struct BrokenWriter;

#[async_trait]
impl TextGenerator for BrokenWriter {
    fn name(&self) -> &str {
        "broken"
    }

    async fn complete(&self, _request: &CompletionRequest) -> herald_engine::llm::Result<Completion> {
        Err(LLMError::ProviderUnavailable("offline".to_string()))
    }
}

/// Publishes everything and reports whatever metrics it was given
struct LiveChannel {
    metrics: Mutex<MetricsOutcome>,
}

impl LiveChannel {
    fn new(metrics: MetricsOutcome) -> Self {
        Self {
            metrics: Mutex::new(metrics),
        }
    }
}

#[async_trait]
impl ChannelAdapter for LiveChannel {
    fn channel(&self) -> Channel {
        Channel::Blog
    }

    fn constraints(&self) -> ChannelConstraints {
        ChannelConstraints {
            max_length: 500,
            include_hashtags: false,
            include_cta: true,
        }
    }

    async fn publish(&self, _content: &str, _metadata: &Metadata) -> PublishOutcome {
        let mut metadata = Metadata::new();
        metadata.insert("url".to_string(), serde_json::json!("https://example.test/post/1"));
        PublishOutcome::Published {
            remote_id: "post-1".to_string(),
            metadata,
        }
    }

    async fn fetch_metrics(&self, _remote_id: &str) -> MetricsOutcome {
        self.metrics.lock().unwrap().clone()
    }

    /// Score is the conversions count
    fn score(&self, metrics: &PerformanceMetrics) -> f64 {
        metrics.conversions.unwrap_or(0) as f64
    }
}

fn content(generator: Arc<dyn TextGenerator>) -> Arc<ContentGenerator> {
    Arc::new(ContentGenerator::new(generator, 5, 1000))
}

fn placeholder_agent(
    memory: Arc<dyn MemoryStore>,
    config: AgentConfig,
    generator: Arc<dyn TextGenerator>,
) -> Agent {
    let adapter = adapter_for(config.channel);
    Agent::new(config, adapter, content(generator), memory).unwrap()
}

fn live_agent(memory: Arc<dyn MemoryStore>, metrics: MetricsOutcome) -> Agent {
    let mut config = AgentConfig::new("blog-live", Channel::Blog);
    config.learning_rate = 1.0;
    Agent::new(
        config,
        Box::new(LiveChannel::new(metrics)),
        content(Arc::new(TopicWriter)),
        memory,
    )
    .unwrap()
}

#[tokio::test]
async fn test_single_agent_full_cycle() {
    let memory: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(memory.clone(), vec!["mornings".to_string()]);

    let conversions = PerformanceMetrics {
        conversions: Some(80),
        ..Default::default()
    };
    orchestrator
        .register_agent(live_agent(memory.clone(), MetricsOutcome::Measured(conversions)))
        .await;

    let agent = orchestrator.agent("blog-live").await.unwrap();
    assert!(agent.should_post_now().await);

    let actions = orchestrator.run_scheduled_agents(&[]).await;
    assert_eq!(actions.len(), 1);
    let action = &actions[0];
    assert_eq!(action.status, ActionStatus::Posted);
    assert_eq!(action.metadata["url"], "https://example.test/post/1");
    assert_eq!(memory.stats("blog-live").await.total_actions, 1);

    // Just posted, so the cooldown applies
    assert!(!agent.should_post_now().await);

    let update = orchestrator
        .update_performance("blog-live", &action.id)
        .await
        .unwrap();
    assert_eq!(update.performance.source, MetricsSource::Measured);
    assert_eq!(update.performance.score, 80.0);

    let learnings = update.learnings;
    assert_eq!(learnings.total_actions, 1);
    assert_eq!(learnings.successful_actions, 1);
    assert_eq!(learnings.average_score, 80.0);
    assert!(learnings
        .best_performing_topics
        .iter()
        .any(|t| action.content.to_lowercase().contains(t.as_str())));
    assert!(learnings.best_performing_topics.contains(&"gratitude".to_string()));
}

#[tokio::test]
async fn test_disabled_agent_never_runs() {
    let memory: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(memory.clone(), vec![]);

    let enabled = AgentConfig::new("reddit-on", Channel::Reddit);
    let mut disabled = AgentConfig::new("reddit-off", Channel::Reddit);
    disabled.enabled = false;

    orchestrator
        .register_agent(placeholder_agent(memory.clone(), enabled, Arc::new(TopicWriter)))
        .await;
    orchestrator
        .register_agent(placeholder_agent(memory.clone(), disabled, Arc::new(TopicWriter)))
        .await;

    let report = orchestrator.run_scheduled(None).await;
    assert_eq!(report.ran, vec!["reddit-on"]);
    assert!(report.actions.iter().all(|a| a.agent_id == "reddit-on"));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].eligibility, Eligibility::Disabled);
    assert!(memory.last_action("reddit-off").await.is_none());
}

#[tokio::test]
async fn test_failures_do_not_stop_other_agents() {
    let memory: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(memory.clone(), vec![]);

    orchestrator
        .register_agent(placeholder_agent(
            memory.clone(),
            AgentConfig::new("email-broken", Channel::Email),
            Arc::new(BrokenWriter),
        ))
        .await;
    orchestrator
        .register_agent(live_agent(memory.clone(), MetricsOutcome::NotIntegrated))
        .await;

    let report = orchestrator
        .run_scheduled(Some(vec!["focus".to_string()]))
        .await;
    assert_eq!(report.actions.len(), 2);

    let broken = report
        .actions
        .iter()
        .find(|a| a.agent_id == "email-broken")
        .unwrap();
    assert_eq!(broken.status, ActionStatus::Failed);
    assert_eq!(broken.failure.as_ref().unwrap().kind, FailureKind::Generation);

    let live = report
        .actions
        .iter()
        .find(|a| a.agent_id == "blog-live")
        .unwrap();
    assert_eq!(live.status, ActionStatus::Posted);
}

#[tokio::test]
async fn test_topics_assigned_round_robin() {
    let memory: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(memory.clone(), vec![]);

    for id in ["a-tiktok", "b-tiktok", "c-tiktok"] {
        orchestrator
            .register_agent(placeholder_agent(
                memory.clone(),
                AgentConfig::new(id, Channel::TikTok),
                Arc::new(TopicWriter),
            ))
            .await;
    }

    let topics = vec!["sleep".to_string(), "focus".to_string()];
    let actions = orchestrator.run_scheduled_agents(&topics).await;
    let assigned: Vec<(&str, &str)> = actions
        .iter()
        .map(|a| {
            (
                a.agent_id.as_str(),
                a.metadata["topic"].as_str().unwrap_or_default(),
            )
        })
        .collect();
    assert_eq!(
        assigned,
        vec![("a-tiktok", "sleep"), ("b-tiktok", "focus"), ("c-tiktok", "sleep")]
    );
}

#[tokio::test]
async fn test_placeholder_channels_report_not_integrated() {
    let memory: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(memory.clone(), vec![]);
    orchestrator
        .register_agent(placeholder_agent(
            memory.clone(),
            AgentConfig::new("instagram-main", Channel::Instagram),
            Arc::new(TopicWriter),
        ))
        .await;

    let action = orchestrator
        .run_agent_by_id("instagram-main", Some("sunrise"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(action.status, ActionStatus::Failed);
    assert_eq!(
        action.failure.as_ref().unwrap().kind,
        FailureKind::NotIntegrated
    );
    assert!(!action.content.is_empty());

    let update = orchestrator
        .update_performance("instagram-main", &action.id)
        .await
        .unwrap();
    assert_eq!(update.performance.score, 0.0);
    assert_eq!(update.performance.source, MetricsSource::Unavailable);
}

#[tokio::test]
async fn test_measurement_failure_degrades_to_zero() {
    let memory: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(memory.clone(), vec!["calm".to_string()]);
    orchestrator
        .register_agent(live_agent(
            memory.clone(),
            MetricsOutcome::Failed("analytics down".to_string()),
        ))
        .await;

    let action = orchestrator
        .run_agent_by_id("blog-live", None)
        .await
        .unwrap()
        .unwrap();
    assert!(action.is_posted());

    let update = orchestrator
        .update_performance("blog-live", &action.id)
        .await
        .unwrap();
    assert_eq!(update.performance.score, 0.0);
    assert_eq!(update.performance.source, MetricsSource::Unavailable);
    assert_eq!(update.learnings.total_actions, 1);
    assert_eq!(update.learnings.successful_actions, 0);
}

#[tokio::test]
async fn test_learning_adapts_preferred_hours() {
    let memory: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(memory.clone(), vec![]);
    let metrics = PerformanceMetrics {
        conversions: Some(90),
        ..Default::default()
    };
    orchestrator
        .register_agent(live_agent(memory.clone(), MetricsOutcome::Measured(metrics)))
        .await;

    let action = orchestrator
        .run_agent_by_id("blog-live", Some("evening"))
        .await
        .unwrap()
        .unwrap();
    let update = orchestrator
        .update_performance("blog-live", &action.id)
        .await
        .unwrap();

    use chrono::Timelike;
    assert_eq!(
        update.config.posting_frequency.preferred_times,
        vec![action.timestamp.hour()]
    );
    assert_eq!(update.learnings.optimal_posting_times, vec![action.timestamp.hour()]);
}

#[tokio::test]
async fn test_cooldown_boundary_through_orchestrator() {
    let memory: Arc<dyn MemoryStore> = Arc::new(InMemoryStore::new());
    let orchestrator = Orchestrator::new(memory.clone(), vec![]);
    orchestrator
        .register_agent(placeholder_agent(
            memory.clone(),
            AgentConfig::new("twitter-main", Channel::Twitter),
            Arc::new(TopicWriter),
        ))
        .await;

    let last = Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap();
    memory
        .record_action(
            AgentAction::pending(
                "twitter-main",
                sdk::types::ActionKind::Post,
                Channel::Twitter,
                "earlier",
                Metadata::new(),
            )
            .with_timestamp(last),
        )
        .await
        .unwrap();

    let early = orchestrator
        .run_scheduled_agents_at(last + Duration::minutes(239), &[])
        .await;
    assert!(early.ran.is_empty());

    let on_time = orchestrator
        .run_scheduled_agents_at(last + Duration::hours(4), &[])
        .await;
    assert_eq!(on_time.ran, vec!["twitter-main"]);
}

#[tokio::test]
async fn test_from_default_config() {
    let config = Config::default();
    let orchestrator =
        Orchestrator::from_config(&config, content(Arc::new(TopicWriter))).unwrap();

    let status = orchestrator.status().await;
    assert_eq!(status.total_agents, Channel::ALL.len());
    for channel in Channel::ALL {
        assert_eq!(status.by_channel.get(&channel), Some(&1));
    }

    let summaries = orchestrator.list_agents().await;
    assert_eq!(summaries.len(), Channel::ALL.len());
    assert!(summaries.iter().all(|s| s.stats.total_actions == 0));
}
