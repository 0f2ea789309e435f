//! Error types and handling
//!
//! This module provides the error types used throughout Herald.
//! All errors implement the `HeraldErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! Error messages never carry API keys. Provider response bodies are kept in
//! the message for operators, while `user_hint` stays generic.

use thiserror::Error;

/// Result type for Herald operations
pub type Result<T> = std::result::Result<T, HeraldError>;

/// Trait for Herald error extensions
pub trait HeraldErrorExt {
    /// Returns a user-friendly hint for the error
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried on the next scheduled run. Non-recoverable
    /// errors need an operator to change configuration or credentials.
    fn is_recoverable(&self) -> bool;
}

/// Main Herald error type
///
/// # Error Categories
///
/// - **Configuration**: Invalid or missing configuration
/// - **Generation**: The text-generation call failed, timed out or returned nothing
/// - **Measurement**: A channel could not report metrics
/// - **Lookup**: An unknown agent or action identity
/// - **Storage**: The memory store could not accept a write
///
/// # Examples
///
/// ```
/// use sdk::errors::{HeraldError, HeraldErrorExt};
///
/// let error = HeraldError::GenerationTimeout { secs: 30 };
/// println!("Hint: {}", error.user_hint());
/// assert!(error.is_recoverable());
///
/// let fatal_error = HeraldError::Config("missing model".to_string());
/// assert!(!fatal_error.is_recoverable());
/// ```
#[derive(Debug, Error)]
pub enum HeraldError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generation errors
    #[error("Content generation failed: {0}")]
    Generation(String),

    #[error("Content generation returned empty content")]
    EmptyGeneration,

    #[error("Content generation timed out after {secs}s")]
    GenerationTimeout { secs: u64 },

    // Channel errors
    #[error("Performance measurement failed: {0}")]
    Measurement(String),

    // Lookup errors
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Action not found: {0}")]
    ActionNotFound(String),

    // Memory store errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl HeraldErrorExt for HeraldError {
    fn user_hint(&self) -> &str {
        match self {
            Self::Config(_) => "Check your config.toml file for errors",

            Self::Generation(_) => {
                "Text generation provider unavailable. Check your API key and network"
            }
            Self::EmptyGeneration => "The provider returned no content. Try another topic",
            Self::GenerationTimeout { .. } => {
                "Text generation took too long to respond. Try again"
            }

            Self::Measurement(_) => "Channel metrics are not available yet",

            Self::AgentNotFound(_) => "No agent is registered under that id",
            Self::ActionNotFound(_) => "No action is recorded under that id",

            Self::Storage(_) => "Agent memory could not be updated",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Non-recoverable errors
            Self::Config(_) | Self::AgentNotFound(_) => false,

            // All other errors are potentially recoverable
            _ => true,
        }
    }
}
