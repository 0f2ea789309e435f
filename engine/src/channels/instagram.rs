//! Instagram: visual-feed captions

use async_trait::async_trait;
use tracing::debug;

use super::{capped, ratio, total};
use crate::agent::{ChannelAdapter, ChannelConstraints, MetricsOutcome, PublishOutcome};
use sdk::types::{Channel, Metadata, PerformanceMetrics};

pub struct InstagramChannel;

#[async_trait]
impl ChannelAdapter for InstagramChannel {
    fn channel(&self) -> Channel {
        Channel::Instagram
    }

    fn constraints(&self) -> ChannelConstraints {
        ChannelConstraints {
            max_length: 2200,
            include_hashtags: true,
            include_cta: true,
        }
    }

    async fn publish(&self, content: &str, _metadata: &Metadata) -> PublishOutcome {
        debug!("Instagram publish skipped ({} chars)", content.chars().count());
        PublishOutcome::NotIntegrated
    }

    async fn fetch_metrics(&self, _remote_id: &str) -> MetricsOutcome {
        MetricsOutcome::NotIntegrated
    }

    /// Likes, comments and shares, plus a bonus for interactions over reach
    fn score(&self, metrics: &PerformanceMetrics) -> f64 {
        let reach_rate = ratio(metrics.interactions(), metrics.reach) * 100.0;
        total(&[
            capped(metrics.likes, 0.3, 35.0),
            capped(metrics.comments, 1.0, 25.0),
            capped(metrics.shares, 2.0, 20.0),
            (reach_rate * 2.0).min(20.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score() {
        let metrics = PerformanceMetrics {
            likes: Some(50),    // 15
            comments: Some(10), // 10
            shares: Some(5),    // 10
            reach: Some(2_000), // 65 / 2000 = 3.25% -> 6.5
            ..Default::default()
        };
        assert!((InstagramChannel.score(&metrics) - 41.5).abs() < 1e-9);
    }
}
