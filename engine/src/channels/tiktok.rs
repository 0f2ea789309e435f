//! TikTok: short-video captions

use async_trait::async_trait;
use tracing::debug;

use super::{capped, total};
use crate::agent::{ChannelAdapter, ChannelConstraints, MetricsOutcome, PublishOutcome};
use sdk::types::{Channel, Metadata, PerformanceMetrics};

pub struct TikTokChannel;

#[async_trait]
impl ChannelAdapter for TikTokChannel {
    fn channel(&self) -> Channel {
        Channel::TikTok
    }

    fn constraints(&self) -> ChannelConstraints {
        ChannelConstraints {
            max_length: 300,
            include_hashtags: true,
            include_cta: true,
        }
    }

    async fn publish(&self, content: &str, _metadata: &Metadata) -> PublishOutcome {
        debug!("TikTok publish skipped ({} chars)", content.chars().count());
        PublishOutcome::NotIntegrated
    }

    async fn fetch_metrics(&self, _remote_id: &str) -> MetricsOutcome {
        MetricsOutcome::NotIntegrated
    }

    fn score(&self, metrics: &PerformanceMetrics) -> f64 {
        total(&[
            capped(metrics.views, 1.0 / 100.0, 30.0),
            capped(metrics.likes, 0.2, 25.0),
            capped(metrics.shares, 1.0, 25.0),
            capped(metrics.comments, 0.5, 20.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score() {
        let metrics = PerformanceMetrics {
            views: Some(1_500), // 15
            likes: Some(50),    // 10
            shares: Some(8),    // 8
            comments: Some(10), // 5
            ..Default::default()
        };
        assert!((TikTokChannel.score(&metrics) - 38.0).abs() < 1e-9);
    }
}
