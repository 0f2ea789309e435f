//! Text Generation Provider Layer
//!
//! This module provides the outbound text-generation contract used by the
//! content generator: one call taking a system instruction, a user instruction,
//! a token budget and a temperature, returning generated text or an error.
//! Providers (OpenAI-compatible, Ollama) implement the `TextGenerator` trait.

use async_trait::async_trait;
use sdk::errors::HeraldError;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod ollama;
pub mod openai;

/// Result type for provider operations
pub type Result<T> = std::result::Result<T, LLMError>;

/// Errors that can occur during a completion call
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout")]
    Timeout,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Empty response")]
    EmptyResponse,
}

impl From<LLMError> for HeraldError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::EmptyResponse => HeraldError::EmptyGeneration,
            other => HeraldError::Generation(other.to_string()),
        }
    }
}

/// Message sent to a chat-style provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
        }
    }
}

/// One text-completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System-level instruction (brand voice + channel style + tone)
    pub system: String,

    /// User-level instruction (topic, audience, constraints)
    pub user: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    pub temperature: f32,
}

impl CompletionRequest {
    /// The request as a system + user message pair
    pub fn messages(&self) -> [Message; 2] {
        [Message::system(&self.system), Message::user(&self.user)]
    }
}

/// Generated text returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,

    /// Model that produced the text, when the provider reports it
    pub model: Option<String>,
}

/// Text generation provider
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the name of the provider (e.g., "openai", "ollama")
    fn name(&self) -> &str;

    /// Run one completion.
    ///
    /// Returns `LLMError::EmptyResponse` when the provider answers with no
    /// text, so callers never see an empty `Completion`.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion>;

    /// Check if the provider is currently reachable.
    /// Default implementation returns true.
    async fn check_health(&self) -> bool {
        true
    }
}
