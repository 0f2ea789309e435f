//! Report structures returned to triggers
//!
//! Everything here is JSON-serializable so a request layer can hand it back
//! unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::agent::Eligibility;
use crate::memory::MemoryStats;
use sdk::types::{
    ActionFailure, ActionKind, ActionStatus, AgentAction, AgentConfig, AgentLearnings,
    AgentPerformance, Channel,
};

/// Characters of content kept in an action summary
const PREVIEW_CHARS: usize = 80;

/// Short view of one action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSummary {
    pub id: String,
    pub kind: ActionKind,
    pub status: ActionStatus,
    pub timestamp: DateTime<Utc>,
    pub preview: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ActionFailure>,
}

impl From<&AgentAction> for ActionSummary {
    fn from(action: &AgentAction) -> Self {
        let mut preview: String = action.content.chars().take(PREVIEW_CHARS).collect();
        if action.content.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }

        Self {
            id: action.id.clone(),
            kind: action.kind,
            status: action.status,
            timestamp: action.timestamp,
            preview,
            remote_id: action.remote_id.clone(),
            failure: action.failure.clone(),
        }
    }
}

/// One agent as listed by `list_agents`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: String,
    pub name: String,
    pub channel: Channel,
    pub enabled: bool,
    pub should_post_now: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_action: Option<ActionSummary>,

    pub stats: MemoryStats,
    pub learnings: AgentLearnings,
}

/// Full view of one agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentDetail {
    #[serde(flatten)]
    pub summary: AgentSummary,

    /// Current config, including learned tone and hours
    pub config: AgentConfig,

    pub eligibility: Eligibility,

    /// More than `max_hours` since the last action
    pub overdue: bool,

    /// Most recent first
    pub recent_actions: Vec<AgentAction>,

    /// Most recent first
    pub performance_history: Vec<AgentPerformance>,
}

/// Aggregate registry counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorStatus {
    pub total_agents: usize,
    pub enabled_agents: usize,
    pub by_channel: BTreeMap<Channel, usize>,
}

/// An agent the scheduled run did not run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedAgent {
    pub id: String,
    pub eligibility: Eligibility,
}

/// Result of a scheduled run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Agents whose action was produced and recorded
    pub ran: Vec<String>,

    pub actions: Vec<AgentAction>,

    pub skipped: Vec<SkippedAgent>,
}

/// Result of a performance update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceUpdate {
    pub performance: AgentPerformance,
    pub learnings: AgentLearnings,

    /// Config after learnings were applied
    pub config: AgentConfig,
}
