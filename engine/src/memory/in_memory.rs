//! Process-memory `MemoryStore`
//!
//! Per-agent records live behind one async `RwLock`. Nothing is persisted;
//! the store lives as long as the process.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{learnings, MemoryStats, MemoryStore};
use sdk::errors::{HeraldError, Result};
use sdk::types::{ActionStatus, AgentAction, AgentLearnings, AgentPerformance};

/// Everything remembered about one agent
#[derive(Debug, Default)]
struct AgentRecords {
    /// In insertion order
    actions: Vec<AgentAction>,

    /// In insertion order
    performances: Vec<AgentPerformance>,

    learnings: AgentLearnings,
}

impl AgentRecords {
    fn find_action(&self, action_id: &str) -> Option<&AgentAction> {
        self.actions.iter().find(|a| a.id == action_id)
    }
}

/// In-process memory store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    agents: RwLock<HashMap<String, AgentRecords>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of agents with at least one record
    pub async fn agent_count(&self) -> usize {
        self.agents.read().await.len()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn record_action(&self, action: AgentAction) -> Result<()> {
        let mut agents = self.agents.write().await;
        let records = agents.entry(action.agent_id.clone()).or_default();

        if records.find_action(&action.id).is_some() {
            return Err(HeraldError::Storage(format!(
                "action {} already recorded for agent {}",
                action.id, action.agent_id
            )));
        }

        debug!(
            "Recording {:?} action {} for agent {}",
            action.status, action.id, action.agent_id
        );
        records.actions.push(action);
        Ok(())
    }

    async fn record_performance(&self, performance: AgentPerformance) -> Result<AgentLearnings> {
        let mut agents = self.agents.write().await;
        let records = agents.entry(performance.agent_id.clone()).or_default();

        debug!(
            "Recording performance {:.1} for action {} of agent {}",
            performance.score, performance.action_id, performance.agent_id
        );
        records.performances.push(performance);

        records.learnings = learnings::derive(
            &records.actions,
            &records.performances,
            &records.learnings.best_performing_topics,
        );
        Ok(records.learnings.clone())
    }

    async fn action(&self, agent_id: &str, action_id: &str) -> Option<AgentAction> {
        let agents = self.agents.read().await;
        agents.get(agent_id)?.find_action(action_id).cloned()
    }

    async fn last_action(&self, agent_id: &str) -> Option<AgentAction> {
        let agents = self.agents.read().await;
        agents
            .get(agent_id)?
            .actions
            .iter()
            .max_by_key(|a| a.timestamp)
            .cloned()
    }

    async fn actions(&self, agent_id: &str, limit: usize) -> Vec<AgentAction> {
        let agents = self.agents.read().await;
        let Some(records) = agents.get(agent_id) else {
            return Vec::new();
        };
        let mut actions = records.actions.clone();
        actions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        actions.truncate(limit);
        actions
    }

    async fn performance_history(&self, agent_id: &str, limit: usize) -> Vec<AgentPerformance> {
        let agents = self.agents.read().await;
        let Some(records) = agents.get(agent_id) else {
            return Vec::new();
        };
        let mut history = records.performances.clone();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        history.truncate(limit);
        history
    }

    async fn learnings(&self, agent_id: &str) -> AgentLearnings {
        let agents = self.agents.read().await;
        agents
            .get(agent_id)
            .map(|r| r.learnings.clone())
            .unwrap_or_default()
    }

    async fn reinforce_pattern(&self, agent_id: &str, action_id: &str) -> Result<AgentLearnings> {
        let mut agents = self.agents.write().await;
        let Some(records) = agents.get_mut(agent_id) else {
            return Ok(AgentLearnings::default());
        };

        let Some(action) = records.actions.iter().find(|a| a.id == action_id) else {
            debug!("Nothing to reinforce: action {} not found", action_id);
            return Ok(records.learnings.clone());
        };

        let added = learnings::reinforce(&mut records.learnings.best_performing_topics, action);
        debug!(
            "Reinforced {} new topic(s) for agent {} from action {}",
            added, agent_id, action_id
        );
        Ok(records.learnings.clone())
    }

    async fn avoid_pattern(&self, agent_id: &str, action_id: &str) -> Result<AgentLearnings> {
        // No negative weighting yet; learnings are returned untouched
        debug!(
            "Low-scoring action {} for agent {}; learnings unchanged",
            action_id, agent_id
        );
        Ok(self.learnings(agent_id).await)
    }

    async fn stats(&self, agent_id: &str) -> MemoryStats {
        let agents = self.agents.read().await;
        let Some(records) = agents.get(agent_id) else {
            return MemoryStats::default();
        };

        let count = |status: ActionStatus| {
            records
                .actions
                .iter()
                .filter(|a| a.status == status)
                .count()
        };

        MemoryStats {
            total_actions: records.actions.len(),
            posted: count(ActionStatus::Posted),
            failed: count(ActionStatus::Failed),
            pending: count(ActionStatus::Pending),
            measured: records.performances.len(),
        }
    }
}
