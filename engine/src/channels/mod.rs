//! Channel Adapters
//!
//! One `ChannelAdapter` per publishing surface. Each carries its own content
//! rules and scoring formula. None of them talk to a live platform yet:
//! `publish` and `fetch_metrics` report `NotIntegrated`.
//!
//! Scores are built from capped contributions, each clamped before
//! summation, with the total clamped to 0-100.

pub mod blog;
pub mod email;
pub mod instagram;
pub mod reddit;
pub mod tiktok;
pub mod twitter;

use crate::agent::ChannelAdapter;
use sdk::types::Channel;

pub use blog::BlogChannel;
pub use email::EmailChannel;
pub use instagram::InstagramChannel;
pub use reddit::RedditChannel;
pub use tiktok::TikTokChannel;
pub use twitter::TwitterChannel;

/// The adapter serving a channel
pub fn adapter_for(channel: Channel) -> Box<dyn ChannelAdapter> {
    match channel {
        Channel::Twitter => Box::new(TwitterChannel),
        Channel::Reddit => Box::new(RedditChannel),
        Channel::Blog => Box::new(BlogChannel),
        Channel::Email => Box::new(EmailChannel),
        Channel::TikTok => Box::new(TikTokChannel),
        Channel::Instagram => Box::new(InstagramChannel),
    }
}

/// `value * weight`, capped at `cap`
pub(crate) fn capped(value: Option<u64>, weight: f64, cap: f64) -> f64 {
    (value.unwrap_or(0) as f64 * weight).min(cap)
}

/// `numerator / denominator`, or 0 when the denominator is missing or zero
pub(crate) fn ratio(numerator: u64, denominator: Option<u64>) -> f64 {
    match denominator {
        Some(d) if d > 0 => numerator as f64 / d as f64,
        _ => 0.0,
    }
}

/// Clamp a summed score to 0-100
pub(crate) fn total(parts: &[f64]) -> f64 {
    parts.iter().sum::<f64>().clamp(0.0, 100.0)
}
