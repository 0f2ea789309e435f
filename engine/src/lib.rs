//! Herald Engine Library
//!
//! This library provides the multi-channel content-agent core: content
//! generation, agent memory, channel agents and the orchestrator.
//! It is used by both the `herald` binary and integration tests.

/// Configuration management module
pub mod config;

/// Telemetry and Observability
pub mod telemetry;

/// Text generation provider layer
pub mod llm;

/// Content generator: prompts, post-processing, variations
pub mod content;

/// Agent memory: actions, performances, learnings
pub mod memory;

/// Channel agent contract and scheduling policy
pub mod agent;

/// Per-channel adapters
pub mod channels;

/// Agent registry and coordination
pub mod orchestrator;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;
