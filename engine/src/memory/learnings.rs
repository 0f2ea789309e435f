//! Learnings derivation
//!
//! Pure functions that rebuild an agent's `AgentLearnings` from its full
//! action and performance history. Nothing here is patched incrementally:
//! every call recomputes from the inputs, so repeated derivation over the same
//! history yields the same result.

use chrono::Timelike;
use std::collections::{BTreeMap, HashMap};

use crate::content::analysis::extract_keywords;
use sdk::types::{AgentAction, AgentLearnings, AgentPerformance, Tone};

/// Scores above this count as successful
pub const SUCCESS_THRESHOLD: f64 = 50.0;

/// Hours and tones must average above this to be kept
pub const OPTIMAL_THRESHOLD: f64 = 60.0;

/// Keywords merged into best topics per reinforced action
pub const REINFORCE_KEYWORDS: usize = 5;

/// Rebuild learnings from the agent's history.
///
/// `previous_topics` are carried over unchanged; topics only grow through
/// `reinforce`. Performances whose action is missing count toward the totals
/// and the average but not toward hours or tones.
pub fn derive(
    actions: &[AgentAction],
    performances: &[AgentPerformance],
    previous_topics: &[String],
) -> AgentLearnings {
    let total_actions = performances.len();
    let successful_actions = performances
        .iter()
        .filter(|p| p.score > SUCCESS_THRESHOLD)
        .count();
    let average_score = mean(performances.iter().map(|p| p.score)).unwrap_or(0.0);

    AgentLearnings {
        best_tone: best_tone(actions, performances),
        best_performing_topics: previous_topics.to_vec(),
        optimal_posting_times: optimal_hours(actions, performances),
        average_score,
        total_actions,
        successful_actions,
    }
}

/// UTC hours whose mean score exceeds 60, ascending.
///
/// Only actions with a matching performance take part, grouped by the hour of
/// the action's timestamp.
pub fn optimal_hours(actions: &[AgentAction], performances: &[AgentPerformance]) -> Vec<u32> {
    let by_id: HashMap<&str, &AgentAction> = actions.iter().map(|a| (a.id.as_str(), a)).collect();

    let mut per_hour: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for perf in performances {
        if let Some(action) = by_id.get(perf.action_id.as_str()) {
            per_hour
                .entry(action.timestamp.hour())
                .or_default()
                .push(perf.score);
        }
    }

    per_hour
        .into_iter()
        .filter_map(|(hour, scores)| {
            mean(scores.into_iter())
                .filter(|avg| *avg > OPTIMAL_THRESHOLD)
                .map(|_| hour)
        })
        .collect()
}

/// Tone with the highest mean score among tones averaging above 60.
///
/// Ties go to the tone seen first in the performance history.
pub fn best_tone(actions: &[AgentAction], performances: &[AgentPerformance]) -> Option<Tone> {
    let by_id: HashMap<&str, &AgentAction> = actions.iter().map(|a| (a.id.as_str(), a)).collect();

    let mut order: Vec<Tone> = Vec::new();
    let mut per_tone: HashMap<Tone, Vec<f64>> = HashMap::new();
    for perf in performances {
        let Some(tone) = by_id.get(perf.action_id.as_str()).and_then(|a| a.tone()) else {
            continue;
        };
        let scores = per_tone.entry(tone).or_default();
        if scores.is_empty() {
            order.push(tone);
        }
        scores.push(perf.score);
    }

    let mut best: Option<(Tone, f64)> = None;
    for tone in order {
        let Some(avg) = mean(per_tone[&tone].iter().copied()) else {
            continue;
        };
        if avg <= OPTIMAL_THRESHOLD {
            continue;
        }
        if best.map_or(true, |(_, top)| avg > top) {
            best = Some((tone, avg));
        }
    }
    best.map(|(tone, _)| tone)
}

/// Union the action's top keywords into `topics`, keeping existing order.
///
/// Returns the number of topics added.
pub fn reinforce(topics: &mut Vec<String>, action: &AgentAction) -> usize {
    let mut added = 0;
    for keyword in extract_keywords(&action.content, REINFORCE_KEYWORDS) {
        if !topics.contains(&keyword) {
            topics.push(keyword);
            added += 1;
        }
    }
    added
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}
