use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use proptest::prelude::*;

use herald_engine::agent::schedule::{evaluate, Eligibility};
use herald_engine::memory::learnings::derive;
use herald_engine::memory::{InMemoryStore, MemoryStore};
use sdk::types::{
    ActionKind, AgentAction, AgentConfig, AgentPerformance, Channel, Metadata, PerformanceMetrics,
};

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
}

fn action_at(offset_minutes: i64) -> AgentAction {
    AgentAction::pending(
        "prop-agent",
        ActionKind::Post,
        Channel::Twitter,
        "steady breathing builds calm",
        Metadata::new(),
    )
    .with_timestamp(base_time() + Duration::minutes(offset_minutes))
}

fn performance_for(action: &AgentAction, score: f64) -> AgentPerformance {
    AgentPerformance::measured(
        "prop-agent",
        &action.id,
        PerformanceMetrics::default(),
        score,
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

// The last action is the one with the latest timestamp, regardless of the
// order actions were recorded in
proptest! {
    #[test]
    fn test_last_action_has_latest_timestamp(
        offsets in prop::collection::vec(0i64..100_000, 1..20),
    ) {
        let rt = runtime();
        let store = InMemoryStore::new();
        let actions: Vec<AgentAction> = offsets.iter().map(|o| action_at(*o)).collect();

        let last = rt.block_on(async {
            for action in &actions {
                store.record_action(action.clone()).await.unwrap();
            }
            store.last_action("prop-agent").await
        });

        let latest = actions.iter().map(|a| a.timestamp).max().unwrap();
        prop_assert_eq!(last.unwrap().timestamp, latest);
    }
}

// Totals, successes and the average always match the recorded performances
proptest! {
    #[test]
    fn test_learnings_totals_match_history(
        scores in prop::collection::vec(0.0..=100.0f64, 0..30),
    ) {
        let actions: Vec<AgentAction> = (0..scores.len() as i64).map(|i| action_at(i * 60)).collect();
        let performances: Vec<AgentPerformance> = actions
            .iter()
            .zip(&scores)
            .map(|(a, s)| performance_for(a, *s))
            .collect();

        let learnings = derive(&actions, &performances, &[]);

        prop_assert_eq!(learnings.total_actions, scores.len());
        prop_assert_eq!(
            learnings.successful_actions,
            scores.iter().filter(|s| **s > 50.0).count()
        );
        if scores.is_empty() {
            prop_assert_eq!(learnings.average_score, 0.0);
        } else {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            prop_assert!((learnings.average_score - mean).abs() < 1e-9);
        }
        prop_assert!(learnings.successful_actions <= learnings.total_actions);
    }
}

// Every optimal hour averages above 60, and every hour that does is listed
proptest! {
    #[test]
    fn test_optimal_hours_average_above_threshold(
        samples in prop::collection::vec((0u32..24, 0.0..=100.0f64), 1..40),
    ) {
        let actions: Vec<AgentAction> = samples
            .iter()
            .map(|(hour, _)| action_at(*hour as i64 * 60))
            .collect();
        let performances: Vec<AgentPerformance> = actions
            .iter()
            .zip(&samples)
            .map(|(a, (_, score))| performance_for(a, *score))
            .collect();

        let learnings = derive(&actions, &performances, &[]);

        for hour in 0u32..24 {
            let scores: Vec<f64> = samples
                .iter()
                .filter(|(h, _)| *h == hour)
                .map(|(_, s)| *s)
                .collect();
            let listed = learnings.optimal_posting_times.contains(&hour);
            if scores.is_empty() {
                prop_assert!(!listed);
            } else {
                let mean = scores.iter().sum::<f64>() / scores.len() as f64;
                prop_assert_eq!(listed, mean > 60.0, "hour {} mean {}", hour, mean);
            }
        }

        let mut sorted = learnings.optimal_posting_times.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, learnings.optimal_posting_times);
    }
}

// Re-deriving over the same history gives the same learnings
proptest! {
    #[test]
    fn test_derivation_is_deterministic(
        scores in prop::collection::vec(0.0..=100.0f64, 0..20),
    ) {
        let actions: Vec<AgentAction> = (0..scores.len() as i64).map(|i| action_at(i * 37)).collect();
        let performances: Vec<AgentPerformance> = actions
            .iter()
            .zip(&scores)
            .map(|(a, s)| performance_for(a, *s))
            .collect();
        let topics = vec!["breathing".to_string()];

        let first = derive(&actions, &performances, &topics);
        let second = derive(&actions, &performances, &first.best_performing_topics);
        prop_assert_eq!(first, second);
    }
}

// A disabled agent is never eligible, whatever its window or history
proptest! {
    #[test]
    fn test_disabled_agent_never_eligible(
        min_hours in 0.0..48.0f64,
        preferred in prop::collection::vec(0u32..24, 0..5),
        elapsed_minutes in prop::option::of(0i64..10_000),
        now_offset in 0i64..100_000,
    ) {
        let mut config = AgentConfig::new("prop-agent", Channel::Reddit);
        config.enabled = false;
        config.posting_frequency.min_hours = min_hours;
        config.posting_frequency.max_hours = min_hours + 24.0;
        config.posting_frequency.preferred_times = preferred;

        let now = base_time() + Duration::minutes(now_offset);
        let last = elapsed_minutes.map(|e| {
            action_at(0).with_timestamp(now - Duration::minutes(e))
        });

        prop_assert_eq!(evaluate(&config, last.as_ref(), now), Eligibility::Disabled);
    }
}

// With no preferred hours, eligibility flips exactly at min_hours
proptest! {
    #[test]
    fn test_cooldown_boundary(
        min_minutes in 0i64..3_000,
        delta in -120i64..120,
        now_offset in 10_000i64..100_000,
    ) {
        let mut config = AgentConfig::new("prop-agent", Channel::Blog);
        config.posting_frequency.min_hours = min_minutes as f64 / 60.0;
        config.posting_frequency.max_hours = config.posting_frequency.min_hours + 24.0;

        let now = base_time() + Duration::minutes(now_offset);
        let elapsed = (min_minutes + delta).max(0);
        let last = action_at(0).with_timestamp(now - Duration::minutes(elapsed));

        let eligibility = evaluate(&config, Some(&last), now);
        prop_assert_eq!(eligibility.is_eligible(), elapsed >= min_minutes);
    }
}

// A non-empty preferred_times gates on the current UTC hour
proptest! {
    #[test]
    fn test_preferred_hours_gate(
        preferred in prop::collection::vec(0u32..24, 1..6),
        now_offset in 0i64..100_000,
    ) {
        let mut config = AgentConfig::new("prop-agent", Channel::Instagram);
        config.posting_frequency.preferred_times = preferred.clone();

        let now = base_time() + Duration::minutes(now_offset);
        let eligibility = evaluate(&config, None, now);

        prop_assert_eq!(eligibility.is_eligible(), preferred.contains(&now.hour()));
    }
}
