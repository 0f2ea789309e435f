//! Long-form blog articles

use async_trait::async_trait;
use tracing::debug;

use super::{capped, total};
use crate::agent::{ChannelAdapter, ChannelConstraints, MetricsOutcome, PublishOutcome};
use sdk::types::{Channel, Metadata, PerformanceMetrics};

pub struct BlogChannel;

#[async_trait]
impl ChannelAdapter for BlogChannel {
    fn channel(&self) -> Channel {
        Channel::Blog
    }

    fn constraints(&self) -> ChannelConstraints {
        ChannelConstraints {
            max_length: 6000,
            include_hashtags: false,
            include_cta: true,
        }
    }

    async fn publish(&self, content: &str, _metadata: &Metadata) -> PublishOutcome {
        debug!("Blog publish skipped ({} chars)", content.chars().count());
        PublishOutcome::NotIntegrated
    }

    async fn fetch_metrics(&self, _remote_id: &str) -> MetricsOutcome {
        MetricsOutcome::NotIntegrated
    }

    /// Readership, click-through and conversions
    fn score(&self, metrics: &PerformanceMetrics) -> f64 {
        total(&[
            capped(metrics.views, 1.0 / 20.0, 40.0),
            capped(metrics.clicks, 0.5, 30.0),
            capped(metrics.conversions, 5.0, 30.0),
        ])
    }
}
