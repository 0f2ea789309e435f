//! Content Generator
//!
//! Turns a channel-tailored request into generated text plus lightweight
//! metadata through one call to the configured `TextGenerator`.
//!
//! # Flow
//!
//! 1. Build the system instruction (brand voice + channel style + tone)
//! 2. Build the user instruction (topic, audience, constraints)
//! 3. Call the provider with a bounded token budget, under a timeout
//! 4. Clean the raw text and extract hashtags, keywords and an engagement estimate
//!
//! Errors are returned as `HeraldError`; channel agents turn them into failed
//! actions.

pub mod analysis;
pub mod prompts;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::{LLMConfig, MIN_TOKENS_CAP};
use crate::llm::{CompletionRequest, LLMError, TextGenerator};
use sdk::errors::{HeraldError, Result};
use sdk::types::{Channel, Tone};

/// Temperature used when a request does not override it
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Per-variation temperature step in `generate_variations`
const VARIATION_STEP: f32 = 0.1;

/// Highest temperature a variation may use
const MAX_VARIATION_TEMPERATURE: f32 = 1.2;

/// Number of keywords attached to generated content
const KEYWORD_LIMIT: usize = 5;

/// What to write, for which channel, under which constraints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRequest {
    pub channel: Channel,
    pub topic: String,

    #[serde(default)]
    pub tone: Option<Tone>,

    /// Free-text style guidance
    #[serde(default)]
    pub style: Option<String>,

    #[serde(default)]
    pub audience: Vec<String>,

    /// Maximum length in characters
    pub max_length: usize,

    #[serde(default)]
    pub include_hashtags: bool,

    #[serde(default)]
    pub include_cta: bool,

    /// Extra context appended to the user instruction
    #[serde(default)]
    pub context: Option<String>,

    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl ContentRequest {
    /// Request with no tone, style, audience, hashtags or call to action
    pub fn new(channel: Channel, topic: impl Into<String>, max_length: usize) -> Self {
        Self {
            channel,
            topic: topic.into(),
            tone: None,
            style: None,
            audience: Vec::new(),
            max_length,
            include_hashtags: false,
            include_cta: false,
            context: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Metadata derived from generated text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub hashtags: Vec<String>,
    pub keywords: Vec<String>,

    /// Heuristic 0-100 estimate
    pub estimated_engagement: u32,

    pub character_count: usize,
    pub word_count: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Cleaned text plus its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub content: String,
    pub metadata: ContentMetadata,
}

/// Generates channel content through a text-generation provider
pub struct ContentGenerator {
    provider: Arc<dyn TextGenerator>,
    timeout_secs: u64,
    max_tokens_cap: u32,
}

impl ContentGenerator {
    /// Create a generator with an explicit timeout and token cap
    pub fn new(provider: Arc<dyn TextGenerator>, timeout_secs: u64, max_tokens_cap: u32) -> Self {
        Self {
            provider,
            timeout_secs,
            max_tokens_cap: max_tokens_cap.max(MIN_TOKENS_CAP),
        }
    }

    /// Create a generator using the `[llm]` configuration section
    pub fn from_config(provider: Arc<dyn TextGenerator>, config: &LLMConfig) -> Self {
        Self::new(provider, config.timeout_secs, config.max_tokens_cap)
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Token budget for a requested character length.
    ///
    /// Roughly four characters per token, doubled for headroom, then clamped
    /// to `[MIN_TOKENS_CAP, max_tokens_cap]`.
    pub fn token_budget(&self, max_length: usize) -> u32 {
        let estimate = max_length.div_ceil(4).saturating_mul(2);
        let estimate = u32::try_from(estimate).unwrap_or(u32::MAX);
        estimate.clamp(MIN_TOKENS_CAP, self.max_tokens_cap)
    }

    /// Generate one piece of content.
    pub async fn generate(&self, request: &ContentRequest) -> Result<GeneratedContent> {
        let completion_request = CompletionRequest {
            system: prompts::build_system_prompt(request),
            user: prompts::build_user_prompt(request),
            max_tokens: self.token_budget(request.max_length),
            temperature: request.temperature,
        };

        debug!(
            "Generating {} content on '{}' with {} (max_tokens={}, temperature={:.1})",
            request.channel,
            request.topic,
            self.provider.name(),
            completion_request.max_tokens,
            completion_request.temperature
        );

        let start = Instant::now();
        let completion = match timeout(
            Duration::from_secs(self.timeout_secs),
            self.provider.complete(&completion_request),
        )
        .await
        {
            Ok(Ok(completion)) => completion,
            Ok(Err(LLMError::Timeout)) | Err(_) => {
                warn!(
                    "{} generation timed out after {}s",
                    request.channel, self.timeout_secs
                );
                return Err(HeraldError::GenerationTimeout {
                    secs: self.timeout_secs,
                });
            }
            Ok(Err(e)) => {
                warn!("{} generation failed: {}", request.channel, e);
                return Err(e.into());
            }
        };

        let content = analysis::clean_response(&completion.text);
        if content.is_empty() {
            warn!("{} generation returned only whitespace or wrappers", request.channel);
            return Err(HeraldError::EmptyGeneration);
        }

        let hashtags = analysis::extract_hashtags(&content);
        let metadata = ContentMetadata {
            keywords: analysis::extract_keywords(&content, KEYWORD_LIMIT),
            estimated_engagement: analysis::estimate_engagement(&content, &hashtags),
            character_count: content.chars().count(),
            word_count: content.split_whitespace().count(),
            hashtags,
            model: completion.model,
        };

        info!(
            "Generated {} content ({} chars) in {:.1}s",
            request.channel,
            metadata.character_count,
            start.elapsed().as_secs_f64()
        );

        if metadata.character_count > request.max_length {
            debug!(
                "{} content exceeds requested length ({} > {})",
                request.channel, metadata.character_count, request.max_length
            );
        }

        Ok(GeneratedContent { content, metadata })
    }

    /// Generate `count` independent variations of one request.
    ///
    /// Variation `i` runs at temperature `0.7 + 0.1 * i`, capped at 1.2.
    /// Returns the successful variations in index order, or the first error
    /// when every variation fails.
    pub async fn generate_variations(
        &self,
        request: &ContentRequest,
        count: usize,
    ) -> Result<Vec<GeneratedContent>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let requests: Vec<ContentRequest> = (0..count)
            .map(|i| {
                let mut variation = request.clone();
                variation.temperature = variation_temperature(i);
                variation
            })
            .collect();

        let results = join_all(requests.iter().map(|r| self.generate(r))).await;

        let mut variations = Vec::with_capacity(count);
        let mut first_error = None;
        for (i, result) in results.into_iter().enumerate() {
            match result {
                Ok(content) => variations.push(content),
                Err(e) => {
                    debug!("Variation {} failed: {}", i, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if variations.is_empty() => Err(e),
            _ => Ok(variations),
        }
    }
}

fn variation_temperature(index: usize) -> f32 {
    (DEFAULT_TEMPERATURE + VARIATION_STEP * index as f32).min(MAX_VARIATION_TEMPERATURE)
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}
