//! Configuration updates from learnings
//!
//! The learning loop may overwrite two fields of an agent's config:
//! `personality.tone` and `posting_frequency.preferred_times`. The agent's
//! `learning_rate` decides how much history is needed before that happens.

use sdk::types::{AgentConfig, AgentLearnings};

/// What `apply_learnings` changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub tone_changed: bool,
    pub preferred_times_changed: bool,
}

impl ConfigUpdate {
    pub fn any(&self) -> bool {
        self.tone_changed || self.preferred_times_changed
    }
}

/// Performances required before learnings may change the config.
///
/// `ceil(1 / learning_rate)`; `None` when the rate is zero (frozen config).
pub fn required_samples(learning_rate: f64) -> Option<usize> {
    if learning_rate.is_nan() || learning_rate <= 0.0 {
        return None;
    }
    Some((1.0 / learning_rate.min(1.0)).ceil() as usize)
}

/// Fold learnings into the config.
///
/// The tone is overwritten only when a best tone was derived, and preferred
/// times only when at least one optimal hour was found.
pub fn apply_learnings(
    config: &mut AgentConfig,
    learnings: &AgentLearnings,
    performance_count: usize,
) -> ConfigUpdate {
    let mut update = ConfigUpdate::default();

    let Some(required) = required_samples(config.learning_rate) else {
        return update;
    };
    if performance_count < required {
        return update;
    }

    if let Some(tone) = learnings.best_tone {
        if config.personality.tone != tone {
            config.personality.tone = tone;
            update.tone_changed = true;
        }
    }

    if !learnings.optimal_posting_times.is_empty()
        && config.posting_frequency.preferred_times != learnings.optimal_posting_times
    {
        config.posting_frequency.preferred_times = learnings.optimal_posting_times.clone();
        update.preferred_times_changed = true;
    }

    update
}
