//! Command handlers for CLI operations
//!
//! This module implements the handlers for all CLI commands:
//! - status: Registry counts and provider availability
//! - agents: List agents with eligibility and learnings
//! - agent: Show one agent in detail
//! - run: Run one agent now
//! - run-scheduled: Run every eligible agent
//! - generate: Generate content without publishing
//!
//! Memory lives in-process, so stats and learnings cover the current
//! invocation only.

use anyhow::{Context, Result};
use serde_json::json;
use std::sync::Arc;

use crate::agent::{build_content_request, Eligibility};
use crate::channels::adapter_for;
use crate::config::Config;
use crate::content::{ContentGenerator, ContentRequest};
use crate::llm::ollama::OllamaProvider;
use crate::llm::openai::OpenAIProvider;
use crate::llm::TextGenerator;
use crate::orchestrator::{AgentSummary, Orchestrator};
use sdk::errors::HeraldError;
use sdk::types::{AgentAction, Channel};

/// Printed under in-process reports so zeros are not read as history
const MEMORY_SCOPE_NOTE: &str =
    "Note: agent memory starts empty on every invocation; stats and learnings cover this run only";

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Build the configured text-generation provider
pub fn build_provider(config: &Config) -> Result<Arc<dyn TextGenerator>> {
    match config.llm.provider.as_str() {
        "openai" => {
            let provider = OpenAIProvider::from_config(&config.llm.openai)
                .context("Failed to configure OpenAI provider")?;
            Ok(Arc::new(provider))
        }
        "ollama" => Ok(Arc::new(OllamaProvider::new(
            config.llm.ollama.base_url.clone(),
            config.llm.ollama.model.clone(),
        ))),
        other => Err(anyhow::anyhow!("Unknown provider '{}'", other)),
    }
}

fn build_content(config: &Config) -> Result<Arc<ContentGenerator>> {
    let provider = build_provider(config)?;
    Ok(Arc::new(ContentGenerator::from_config(provider, &config.llm)))
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let content = build_content(config)?;
    Orchestrator::from_config(config, content).context("Failed to build orchestrator")
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn describe_eligibility(eligibility: &Eligibility) -> String {
    match eligibility {
        Eligibility::Eligible => "eligible".to_string(),
        Eligibility::Disabled => "disabled".to_string(),
        Eligibility::OutsidePreferredHours { hour } => {
            format!("outside preferred hours (now {:02}:00 UTC)", hour)
        }
        Eligibility::CoolingDown {
            hours_since_last,
            min_hours,
        } => format!(
            "cooling down ({:.1}h of {:.1}h since last action)",
            hours_since_last, min_hours
        ),
    }
}

fn print_action(action: &AgentAction) {
    println!("Action: {}", action.id);
    println!("  Agent: {} ({})", action.agent_id, action.channel);
    println!("  Status: {:?}", action.status);
    if let Some(remote_id) = &action.remote_id {
        println!("  Remote ID: {}", remote_id);
    }
    if let Some(failure) = &action.failure {
        println!("  Failure ({:?}): {}", failure.kind, failure.message);
    }
    if !action.content.is_empty() {
        println!("  Content:");
        for line in action.content.lines() {
            println!("    {}", line);
        }
    }
}

fn print_summary(summary: &AgentSummary) {
    let marker = if summary.should_post_now { "●" } else { "○" };
    println!(
        "{} {} [{}] {}",
        marker,
        summary.id,
        summary.channel,
        if summary.enabled { "enabled" } else { "disabled" }
    );
    println!(
        "    actions: {} (posted {}, failed {}), measured: {}",
        summary.stats.total_actions,
        summary.stats.posted,
        summary.stats.failed,
        summary.stats.measured
    );
    println!(
        "    average score: {:.1}, success rate: {:.0}%",
        summary.learnings.average_score,
        summary.learnings.success_rate()
    );
}

/// Request in the voice of the first configured agent on `channel`, or a
/// plain channel request when none is configured
fn generate_request(config: &Config, channel: Channel, topic: &str) -> ContentRequest {
    let adapter = adapter_for(channel);
    match config.agents.iter().find(|a| a.channel == channel) {
        Some(agent) => build_content_request(agent, adapter.constraints(), topic, None),
        None => {
            let constraints = adapter.constraints();
            let mut request = ContentRequest::new(channel, topic, constraints.max_length);
            request.include_hashtags = constraints.include_hashtags;
            request.include_cta = constraints.include_cta;
            request
        }
    }
}

/// Show registry counts and provider availability
pub async fn handle_status(config: &Config, format: OutputFormat) -> Result<()> {
    let provider = build_provider(config)?;
    let healthy = provider.check_health().await;
    let orchestrator = Orchestrator::from_config(
        config,
        Arc::new(ContentGenerator::from_config(provider.clone(), &config.llm)),
    )
    .context("Failed to build orchestrator")?;
    let status = orchestrator.status().await;

    match format {
        OutputFormat::Text => {
            println!("Herald Status");
            println!();
            println!(
                "Provider: {} ({})",
                provider.name(),
                if healthy { "available" } else { "unavailable" }
            );
            println!(
                "Agents: {} total, {} enabled",
                status.total_agents, status.enabled_agents
            );
            for (channel, count) in &status.by_channel {
                println!("  {:<10} {}", channel.as_str(), count);
            }
        }
        OutputFormat::Json => {
            print_json(&json!({
                "provider": provider.name(),
                "provider_available": healthy,
                "status": status,
            }))?;
        }
    }

    Ok(())
}

/// List every agent
pub async fn handle_agents(config: &Config, format: OutputFormat) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let summaries = orchestrator.list_agents().await;

    match format {
        OutputFormat::Text => {
            if summaries.is_empty() {
                println!("No agents configured");
                return Ok(());
            }
            println!("Agents (● ready to post):");
            println!();
            for summary in &summaries {
                print_summary(summary);
            }
            println!();
            println!("{}", MEMORY_SCOPE_NOTE);
        }
        OutputFormat::Json => {
            print_json(&json!({
                "agents": summaries,
                "count": summaries.len(),
            }))?;
        }
    }

    Ok(())
}

/// Show one agent in detail
pub async fn handle_agent(
    id: String,
    limit: usize,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let detail = orchestrator
        .agent_detail(&id, limit)
        .await
        .ok_or_else(|| HeraldError::AgentNotFound(id.clone()))?;

    match format {
        OutputFormat::Text => {
            print_summary(&detail.summary);
            println!();
            println!("Schedule: {}", describe_eligibility(&detail.eligibility));
            if detail.overdue {
                println!(
                    "  Overdue: more than {}h since last action",
                    detail.config.posting_frequency.max_hours
                );
            }
            println!("Tone: {}", detail.config.personality.tone);
            let frequency = &detail.config.posting_frequency;
            if frequency.preferred_times.is_empty() {
                println!("Preferred hours: any");
            } else {
                println!("Preferred hours (UTC): {:?}", frequency.preferred_times);
            }
            if !detail.summary.learnings.best_performing_topics.is_empty() {
                println!(
                    "Best topics: {}",
                    detail.summary.learnings.best_performing_topics.join(", ")
                );
            }
            if !detail.recent_actions.is_empty() {
                println!();
                println!("Recent actions:");
                for action in &detail.recent_actions {
                    print_action(action);
                }
            }
            println!();
            println!("{}", MEMORY_SCOPE_NOTE);
        }
        OutputFormat::Json => print_json(&detail)?,
    }

    Ok(())
}

/// Run one agent now
pub async fn handle_run(
    id: String,
    topic: Option<String>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let action = orchestrator
        .run_agent_by_id(&id, topic.as_deref())
        .await
        .context("Failed to record action")?
        .ok_or_else(|| HeraldError::AgentNotFound(id.clone()))?;

    match format {
        OutputFormat::Text => print_action(&action),
        OutputFormat::Json => print_json(&action)?,
    }

    Ok(())
}

/// Run every eligible agent
pub async fn handle_run_scheduled(
    topics: Vec<String>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let topics = (!topics.is_empty()).then_some(topics);
    let report = orchestrator.run_scheduled(topics).await;

    match format {
        OutputFormat::Text => {
            println!(
                "Scheduled run: {} ran, {} skipped",
                report.ran.len(),
                report.skipped.len()
            );
            println!();
            for action in &report.actions {
                print_action(action);
                println!();
            }
            for skipped in &report.skipped {
                println!(
                    "Skipped {}: {}",
                    skipped.id,
                    describe_eligibility(&skipped.eligibility)
                );
            }
        }
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}

/// Generate content for a channel without publishing it
pub async fn handle_generate(
    channel: Channel,
    topic: String,
    variations: usize,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let content = build_content(config)?;
    let request = generate_request(config, channel, &topic);

    let generated = content
        .generate_variations(&request, variations.max(1))
        .await
        .context("Content generation failed")?;

    match format {
        OutputFormat::Text => {
            for (i, item) in generated.iter().enumerate() {
                println!("Variation {} ({} chars):", i + 1, item.metadata.character_count);
                println!("{}", item.content);
                println!();
                if !item.metadata.hashtags.is_empty() {
                    println!("  Hashtags: {}", item.metadata.hashtags.join(" "));
                }
                println!("  Keywords: {}", item.metadata.keywords.join(", "));
                println!(
                    "  Estimated engagement: {}",
                    item.metadata.estimated_engagement
                );
                println!();
            }
        }
        OutputFormat::Json => {
            print_json(&json!({
                "channel": channel,
                "request": request,
                "variations": generated,
            }))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_eligibility() {
        assert_eq!(describe_eligibility(&Eligibility::Eligible), "eligible");
        assert_eq!(
            describe_eligibility(&Eligibility::OutsidePreferredHours { hour: 7 }),
            "outside preferred hours (now 07:00 UTC)"
        );
        assert_eq!(
            describe_eligibility(&Eligibility::CoolingDown {
                hours_since_last: 1.5,
                min_hours: 4.0
            }),
            "cooling down (1.5h of 4.0h since last action)"
        );
    }

    #[test]
    fn test_generate_request_uses_agent_voice() {
        let mut config = Config::default();
        let agent = config
            .agents
            .iter_mut()
            .find(|a| a.channel == Channel::TikTok)
            .unwrap();
        agent.personality.style = "hook first".to_string();
        agent.target_audience = vec!["night owls".to_string()];
        let agent = agent.clone();

        let request = generate_request(&config, Channel::TikTok, "sleep");
        assert_eq!(request.style.as_deref(), Some("hook first"));
        assert_eq!(request.tone, Some(agent.personality.tone));
        assert_eq!(request.audience, vec!["night owls"]);
        assert_eq!(
            request,
            build_content_request(&agent, adapter_for(Channel::TikTok).constraints(), "sleep", None)
        );
    }

    #[test]
    fn test_generate_request_without_agent() {
        let mut config = Config::default();
        config.agents.retain(|a| a.channel != Channel::Reddit);

        let request = generate_request(&config, Channel::Reddit, "focus");
        assert!(request.tone.is_none());
        assert!(request.style.is_none());
        assert_eq!(request.max_length, 2000);
    }

    #[tokio::test]
    async fn test_unknown_agent_is_agent_not_found() {
        let mut config = Config::default();
        config.llm.provider = "ollama".to_string();

        let err = handle_agent("ghost".to_string(), 5, &config, OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HeraldError>(),
            Some(HeraldError::AgentNotFound(id)) if id == "ghost"
        ));
    }

    #[test]
    fn test_build_provider_ollama() {
        let mut config = Config::default();
        config.llm.provider = "ollama".to_string();
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "ollama");
    }
}
