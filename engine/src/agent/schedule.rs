//! Scheduling policy
//!
//! A pure function of an agent's config, its most recent action and the
//! current time. There is no timer: callers evaluate it on demand.
//!
//! Checks, in order:
//! 1. Disabled agents never post
//! 2. A non-empty `preferred_times` must contain the current UTC hour
//! 3. At least `min_hours` must have passed since the last action
//!    (the boundary is inclusive)

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use sdk::types::{AgentAction, AgentConfig};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Outcome of the scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Disabled,
    OutsidePreferredHours { hour: u32 },
    CoolingDown { hours_since_last: f64, min_hours: f64 },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }
}

/// Fractional hours from `since` to `now`; negative if `since` is in the future
pub fn hours_between(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - since).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// Evaluate whether an agent may post at `now`.
pub fn evaluate(
    config: &AgentConfig,
    last_action: Option<&AgentAction>,
    now: DateTime<Utc>,
) -> Eligibility {
    if !config.enabled {
        return Eligibility::Disabled;
    }

    let frequency = &config.posting_frequency;
    let hour = now.hour();
    if !frequency.preferred_times.is_empty() && !frequency.preferred_times.contains(&hour) {
        return Eligibility::OutsidePreferredHours { hour };
    }

    if let Some(last) = last_action {
        let hours_since_last = hours_between(last.timestamp, now);
        if hours_since_last < frequency.min_hours {
            return Eligibility::CoolingDown {
                hours_since_last,
                min_hours: frequency.min_hours,
            };
        }
    }

    Eligibility::Eligible
}

/// True once more than `max_hours` have passed since the last action.
///
/// An agent that has never acted is not overdue.
pub fn is_overdue(
    config: &AgentConfig,
    last_action: Option<&AgentAction>,
    now: DateTime<Utc>,
) -> bool {
    last_action.is_some_and(|last| {
        hours_between(last.timestamp, now) > config.posting_frequency.max_hours
    })
}
