//! Orchestrator
//!
//! Registry and coordination facade over all agents. Constructed once at
//! startup and shared by handle; there is no global instance.
//!
//! # Operations
//!
//! - Registry: `register_agent`, `agents`, `agent`, `status`
//! - Runs: `run_agent`, `run_scheduled_agents`, `run_agent_by_id`, `run_scheduled`
//! - Feedback: `update_performance`
//! - Reports: `list_agents`, `agent_detail`
//!
//! Scheduled runs process agents independently. One agent failing to
//! generate, publish or record never stops the others.

pub mod report;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::agent::{schedule, Agent};
use crate::channels::adapter_for;
use crate::config::Config;
use crate::content::ContentGenerator;
use crate::memory::{InMemoryStore, MemoryStore};
use sdk::errors::{HeraldError, Result};
use sdk::types::{AgentAction, AgentPerformance, MetricsSource};

pub use report::{
    ActionSummary, AgentDetail, AgentSummary, OrchestratorStatus, PerformanceUpdate, RunReport,
    SkippedAgent,
};

/// Topic used when neither the caller nor the config supplies one
pub const FALLBACK_TOPIC: &str = "daily mindfulness";

/// Registry of agents sharing one memory store
pub struct Orchestrator {
    agents: RwLock<HashMap<String, Arc<Agent>>>,
    memory: Arc<dyn MemoryStore>,
    default_topics: Vec<String>,
}

impl Orchestrator {
    /// Create an empty orchestrator
    pub fn new(memory: Arc<dyn MemoryStore>, default_topics: Vec<String>) -> Self {
        Self {
            agents: RwLock::new(HashMap::new()),
            memory,
            default_topics,
        }
    }

    /// Build an orchestrator with one agent per configured `[[agents]]` entry,
    /// backed by a fresh in-process memory store.
    pub fn from_config(config: &Config, content: Arc<ContentGenerator>) -> Result<Self> {
        Self::from_config_with_memory(config, content, Arc::new(InMemoryStore::new()))
    }

    /// `from_config` with an explicit memory store
    pub fn from_config_with_memory(
        config: &Config,
        content: Arc<ContentGenerator>,
        memory: Arc<dyn MemoryStore>,
    ) -> Result<Self> {
        let io_timeout = Duration::from_secs(config.scheduler.publish_timeout_secs);

        let mut agents = HashMap::new();
        for agent_config in &config.agents {
            let agent = Agent::new(
                agent_config.clone(),
                adapter_for(agent_config.channel),
                content.clone(),
                memory.clone(),
            )?
            .with_io_timeout(io_timeout);

            if agents
                .insert(agent_config.id.clone(), Arc::new(agent))
                .is_some()
            {
                warn!("Agent {} defined twice; keeping the last", agent_config.id);
            }
        }

        info!("Orchestrator built with {} agent(s)", agents.len());

        Ok(Self {
            agents: RwLock::new(agents),
            memory,
            default_topics: config.scheduler.default_topics.clone(),
        })
    }

    pub fn memory(&self) -> Arc<dyn MemoryStore> {
        self.memory.clone()
    }

    /// Add an agent, replacing any agent with the same id.
    ///
    /// Returns the replaced agent, if any.
    pub async fn register_agent(&self, agent: Agent) -> Option<Arc<Agent>> {
        let id = agent.id().to_string();
        let previous = self.agents.write().await.insert(id.clone(), Arc::new(agent));
        if previous.is_some() {
            warn!("Agent {} re-registered; previous instance replaced", id);
        } else {
            debug!("Registered agent {}", id);
        }
        previous
    }

    /// Aggregate counts over the registry
    pub async fn status(&self) -> OrchestratorStatus {
        let mut status = OrchestratorStatus::default();
        for agent in self.agents().await {
            status.total_agents += 1;
            if agent.is_enabled().await {
                status.enabled_agents += 1;
            }
            *status.by_channel.entry(agent.channel()).or_insert(0) += 1;
        }
        status
    }

    /// All agents, ordered by id
    pub async fn agents(&self) -> Vec<Arc<Agent>> {
        let mut agents: Vec<Arc<Agent>> = self.agents.read().await.values().cloned().collect();
        agents.sort_by(|a, b| a.id().cmp(b.id()));
        agents
    }

    pub async fn agent(&self, id: &str) -> Option<Arc<Agent>> {
        self.agents.read().await.get(id).cloned()
    }

    /// Run one agent now and store the resulting action.
    ///
    /// The action is returned whether it posted or failed; only a storage
    /// error is an `Err`.
    pub async fn run_agent(&self, agent: &Agent, topic: &str) -> Result<AgentAction> {
        info!("Running agent {} on '{}'", agent.id(), topic);
        let action = agent.run(topic).await;
        self.memory.record_action(action.clone()).await?;
        Ok(action)
    }

    /// Run every agent eligible now. See `run_scheduled_agents_at`.
    pub async fn run_scheduled_agents(&self, topics: &[String]) -> Vec<AgentAction> {
        self.run_scheduled_agents_at(Utc::now(), topics).await.actions
    }

    /// Run every agent eligible at `now`.
    ///
    /// The i-th eligible agent (by id) gets `topics[i % topics.len()]`;
    /// empty `topics` falls back to the configured defaults. Agents run
    /// concurrently and independently; an action that cannot be recorded is
    /// logged and left out of the report.
    pub async fn run_scheduled_agents_at(&self, now: DateTime<Utc>, topics: &[String]) -> RunReport {
        let topics = self.topics_or_default(topics);
        let mut report = RunReport::default();

        let mut eligible = Vec::new();
        for agent in self.agents().await {
            let eligibility = agent.eligibility_at(now).await;
            if eligibility.is_eligible() {
                eligible.push(agent);
            } else {
                debug!("Skipping agent {}: {:?}", agent.id(), eligibility);
                report.skipped.push(SkippedAgent {
                    id: agent.id().to_string(),
                    eligibility,
                });
            }
        }

        let runs = eligible.iter().enumerate().map(|(i, agent)| {
            let topic = topics[i % topics.len()].as_str();
            async move { (agent.id().to_string(), self.run_agent(agent, topic).await) }
        });

        for (id, result) in join_all(runs).await {
            match result {
                Ok(action) => {
                    report.ran.push(id);
                    report.actions.push(action);
                }
                Err(e) => error!("Agent {} ran but its action was not recorded: {}", id, e),
            }
        }

        info!(
            "Scheduled run: {} ran, {} skipped",
            report.ran.len(),
            report.skipped.len()
        );
        report
    }

    /// Measure an action and feed the result back into its agent.
    ///
    /// Returns `None` for an unknown agent or action. A failed measurement
    /// degrades to a zero-score performance instead of aborting the cycle.
    pub async fn update_performance(
        &self,
        agent_id: &str,
        action_id: &str,
    ) -> Option<PerformanceUpdate> {
        let agent = self.agent(agent_id).await?;

        let performance = match agent.track_performance(action_id).await {
            Ok(performance) => performance,
            Err(HeraldError::ActionNotFound(_)) => {
                debug!("No action {} for agent {}", action_id, agent_id);
                return None;
            }
            Err(e) => {
                warn!(
                    "Measuring action {} of agent {} failed: {}",
                    action_id, agent_id, e
                );
                AgentPerformance::zero(agent_id, action_id, MetricsSource::Unavailable)
            }
        };

        let learnings = match agent.learn_from_performance(&performance).await {
            Ok(learnings) => learnings,
            Err(e) => {
                error!("Learning cycle for agent {} failed: {}", agent_id, e);
                self.memory.learnings(agent_id).await
            }
        };

        Some(PerformanceUpdate {
            performance,
            learnings,
            config: agent.config().await,
        })
    }

    /// Summaries of every agent, ordered by id
    pub async fn list_agents(&self) -> Vec<AgentSummary> {
        let now = Utc::now();
        let mut summaries = Vec::new();
        for agent in self.agents().await {
            summaries.push(self.summarize(&agent, now).await);
        }
        summaries
    }

    /// Full report on one agent, with up to `limit` recent actions and
    /// performances
    pub async fn agent_detail(&self, id: &str, limit: usize) -> Option<AgentDetail> {
        let agent = self.agent(id).await?;
        let now = Utc::now();

        Some(AgentDetail {
            summary: self.summarize(&agent, now).await,
            config: agent.config().await,
            eligibility: agent.eligibility_at(now).await,
            overdue: agent.is_overdue_at(now).await,
            recent_actions: self.memory.actions(id, limit).await,
            performance_history: self.memory.performance_history(id, limit).await,
        })
    }

    /// Run scheduled agents now; `None` uses the configured topics
    pub async fn run_scheduled(&self, topics: Option<Vec<String>>) -> RunReport {
        self.run_scheduled_agents_at(Utc::now(), topics.as_deref().unwrap_or(&[]))
            .await
    }

    /// Run one agent by id.
    ///
    /// Without a topic the agent cycles through the configured topics, one
    /// step per recorded action. Returns `Ok(None)` for an unknown agent.
    pub async fn run_agent_by_id(
        &self,
        id: &str,
        topic: Option<&str>,
    ) -> Result<Option<AgentAction>> {
        let Some(agent) = self.agent(id).await else {
            return Ok(None);
        };

        let topic = match topic.map(str::trim).filter(|t| !t.is_empty()) {
            Some(topic) => topic.to_string(),
            None => {
                let topics = self.topics_or_default(&[]);
                let done = self.memory.stats(id).await.total_actions;
                topics[done % topics.len()].clone()
            }
        };

        self.run_agent(&agent, &topic).await.map(Some)
    }

    async fn summarize(&self, agent: &Agent, now: DateTime<Utc>) -> AgentSummary {
        let id = agent.id();
        let config = agent.config().await;
        let last = self.memory.last_action(id).await;

        AgentSummary {
            id: id.to_string(),
            name: config.name.clone(),
            channel: config.channel,
            enabled: config.enabled,
            should_post_now: schedule::evaluate(&config, last.as_ref(), now).is_eligible(),
            last_action: last.as_ref().map(ActionSummary::from),
            stats: self.memory.stats(id).await,
            learnings: self.memory.learnings(id).await,
        }
    }

    fn topics_or_default(&self, topics: &[String]) -> Vec<String> {
        if !topics.is_empty() {
            topics.to_vec()
        } else if !self.default_topics.is_empty() {
            self.default_topics.clone()
        } else {
            vec![FALLBACK_TOPIC.to_string()]
        }
    }
}
