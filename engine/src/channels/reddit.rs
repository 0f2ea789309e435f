//! Reddit: community forum

use async_trait::async_trait;
use tracing::debug;

use super::{capped, total};
use crate::agent::{ChannelAdapter, ChannelConstraints, MetricsOutcome, PublishOutcome};
use sdk::types::{Channel, Metadata, PerformanceMetrics};

pub struct RedditChannel;

#[async_trait]
impl ChannelAdapter for RedditChannel {
    fn channel(&self) -> Channel {
        Channel::Reddit
    }

    fn constraints(&self) -> ChannelConstraints {
        ChannelConstraints {
            max_length: 2000,
            include_hashtags: false,
            include_cta: false,
        }
    }

    async fn publish(&self, content: &str, _metadata: &Metadata) -> PublishOutcome {
        debug!("Reddit publish skipped ({} chars)", content.chars().count());
        PublishOutcome::NotIntegrated
    }

    async fn fetch_metrics(&self, _remote_id: &str) -> MetricsOutcome {
        MetricsOutcome::NotIntegrated
    }

    /// Upvotes count little; discussion counts most
    fn score(&self, metrics: &PerformanceMetrics) -> f64 {
        total(&[
            capped(metrics.likes, 0.2, 40.0),
            capped(metrics.comments, 2.0, 40.0),
            capped(metrics.clicks, 0.5, 20.0),
        ])
    }
}
