//! Twitter / X: short-form social feed

use async_trait::async_trait;
use tracing::debug;

use super::{capped, ratio, total};
use crate::agent::{ChannelAdapter, ChannelConstraints, MetricsOutcome, PublishOutcome};
use sdk::types::{Channel, Metadata, PerformanceMetrics};

pub struct TwitterChannel;

#[async_trait]
impl ChannelAdapter for TwitterChannel {
    fn channel(&self) -> Channel {
        Channel::Twitter
    }

    fn constraints(&self) -> ChannelConstraints {
        ChannelConstraints {
            max_length: 280,
            include_hashtags: true,
            include_cta: true,
        }
    }

    async fn publish(&self, content: &str, _metadata: &Metadata) -> PublishOutcome {
        debug!("Twitter publish skipped ({} chars)", content.chars().count());
        PublishOutcome::NotIntegrated
    }

    async fn fetch_metrics(&self, _remote_id: &str) -> MetricsOutcome {
        MetricsOutcome::NotIntegrated
    }

    /// Likes, retweets and replies, plus a bonus for engagement rate over views
    fn score(&self, metrics: &PerformanceMetrics) -> f64 {
        let engagement_rate = ratio(metrics.interactions(), metrics.views) * 100.0;
        total(&[
            capped(metrics.likes, 0.5, 30.0),
            capped(metrics.shares, 2.0, 30.0),
            capped(metrics.comments, 1.5, 20.0),
            (engagement_rate * 4.0).min(20.0),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score() {
        let metrics = PerformanceMetrics {
            likes: Some(20),    // 10
            shares: Some(5),    // 10
            comments: Some(4),  // 6
            views: Some(1_000), // 2.9% engagement -> 11.6
            ..Default::default()
        };
        let score = TwitterChannel.score(&metrics);
        assert!((score - 37.6).abs() < 1e-9, "got {}", score);
    }

    #[test]
    fn test_contributions_capped() {
        let metrics = PerformanceMetrics {
            likes: Some(1_000),
            shares: Some(1_000),
            comments: Some(1_000),
            views: Some(10),
            ..Default::default()
        };
        assert_eq!(TwitterChannel.score(&metrics), 100.0);
    }

    #[test]
    fn test_no_views_no_bonus() {
        let metrics = PerformanceMetrics {
            likes: Some(10),
            ..Default::default()
        };
        assert_eq!(TwitterChannel.score(&metrics), 5.0);
    }

    #[test]
    fn test_saturated_likes_score_is_bounded() {
        let metrics = PerformanceMetrics {
            likes: Some(u64::MAX),
            shares: Some(1),
            views: Some(10),
            ..Default::default()
        };
        let score = TwitterChannel.score(&metrics);
        // 30 (likes cap) + 2 (one share) + 20 (rate cap)
        assert_eq!(score, 52.0);
    }
}
