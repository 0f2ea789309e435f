//! CLI interface for Herald
//!
//! This module provides the command-line interface using clap's derive API.
//! Each invocation is one operator trigger against a freshly built
//! orchestrator.

use clap::{Parser, Subcommand};
use sdk::types::Channel;
use std::path::PathBuf;

/// Herald multi-channel content agents
///
/// Generates channel-tailored content with a language model, runs the agents
/// whose posting window is open, and reports on their learnings.
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Specify alternate configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show registry counts and provider availability
    Status,

    /// List every agent with its eligibility and learnings
    ///
    /// Agent memory is in-process and starts empty on every invocation, so
    /// stats and learnings read zero here. Measured history only exists within
    /// a long-lived orchestrator.
    Agents,

    /// Show one agent in detail
    ///
    /// Agent memory is in-process and starts empty on every invocation, so
    /// recent actions, performance history and learnings are empty here.
    Agent {
        /// Agent id
        id: String,

        /// Number of recent actions and performances to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Run one agent now
    Run {
        /// Agent id
        id: String,

        /// Topic to write about (defaults to the configured topics)
        #[arg(short, long)]
        topic: Option<String>,
    },

    /// Run every agent whose posting window is open
    RunScheduled {
        /// Topic to hand out; repeat for several
        #[arg(short, long = "topic", value_name = "TOPIC")]
        topics: Vec<String>,
    },

    /// Generate content without publishing it
    Generate {
        /// Channel to write for
        channel: Channel,

        /// Topic to write about
        topic: String,

        /// Number of variations to generate
        #[arg(short, long, default_value = "1")]
        variations: usize,
    },
}
