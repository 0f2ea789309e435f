//! Herald SDK
//!
//! Shared data model and error taxonomy for Herald components.
//! This crate is used by the engine and by anything that consumes the
//! engine's JSON reports (status pages, request handlers).

/// Error types and handling
pub mod errors;

/// Agent, action, performance and learnings types
pub mod types;

// Re-export commonly used types
pub use errors::{HeraldError, HeraldErrorExt, Result};
pub use types::{
    ActionFailure, ActionKind, ActionStatus, AgentAction, AgentConfig, AgentLearnings,
    AgentPerformance, Channel, FailureKind, Metadata, MetricsSource, PerformanceMetrics,
    Personality, PostingFrequency, Tone,
};
