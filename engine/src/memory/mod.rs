//! Agent Memory
//!
//! The single source of truth for actions, performances and derived learnings,
//! partitioned by agent identity. `MemoryStore` is the seam; `InMemoryStore`
//! is the process-memory implementation used by the CLI and tests.
//!
//! Reads never fail: an unknown agent or action yields an empty or default
//! value so status reporting can query defensively. Writes return a `Result`
//! so a persistent implementation can surface storage errors.

pub mod in_memory;
pub mod learnings;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use sdk::errors::Result;
use sdk::types::{AgentAction, AgentLearnings, AgentPerformance};

pub use in_memory::InMemoryStore;

/// Action and measurement counts for one agent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_actions: usize,
    pub posted: usize,
    pub failed: usize,
    pub pending: usize,

    /// Number of performance records
    pub measured: usize,
}

/// Store of agent actions, performances and learnings
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Append an action to its agent's history.
    async fn record_action(&self, action: AgentAction) -> Result<()>;

    /// Append a performance and re-derive the agent's learnings.
    ///
    /// Returns the freshly derived learnings.
    async fn record_performance(&self, performance: AgentPerformance) -> Result<AgentLearnings>;

    /// Look up one action by identity
    async fn action(&self, agent_id: &str, action_id: &str) -> Option<AgentAction>;

    /// The action with the latest timestamp
    async fn last_action(&self, agent_id: &str) -> Option<AgentAction>;

    /// Actions, most recent first, truncated to `limit`
    async fn actions(&self, agent_id: &str, limit: usize) -> Vec<AgentAction>;

    /// Performances, most recent first, truncated to `limit`
    async fn performance_history(&self, agent_id: &str, limit: usize) -> Vec<AgentPerformance>;

    /// Current learnings; defaults for an unknown agent
    async fn learnings(&self, agent_id: &str) -> AgentLearnings;

    /// Merge the action's top keywords into the agent's best topics.
    async fn reinforce_pattern(&self, agent_id: &str, action_id: &str) -> Result<AgentLearnings>;

    /// Hook for low-scoring outcomes. Must leave existing learnings intact.
    async fn avoid_pattern(&self, agent_id: &str, action_id: &str) -> Result<AgentLearnings>;

    async fn stats(&self, agent_id: &str) -> MemoryStats;
}
