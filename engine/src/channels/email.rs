//! Newsletter email

use async_trait::async_trait;
use tracing::debug;

use super::{capped, ratio, total};
use crate::agent::{ChannelAdapter, ChannelConstraints, MetricsOutcome, PublishOutcome};
use sdk::types::{ActionKind, Channel, Metadata, PerformanceMetrics};

pub struct EmailChannel;

#[async_trait]
impl ChannelAdapter for EmailChannel {
    fn channel(&self) -> Channel {
        Channel::Email
    }

    fn action_kind(&self) -> ActionKind {
        ActionKind::Email
    }

    fn constraints(&self) -> ChannelConstraints {
        ChannelConstraints {
            max_length: 1500,
            include_hashtags: false,
            include_cta: true,
        }
    }

    async fn publish(&self, content: &str, _metadata: &Metadata) -> PublishOutcome {
        debug!("Email send skipped ({} chars)", content.chars().count());
        PublishOutcome::NotIntegrated
    }

    async fn fetch_metrics(&self, _remote_id: &str) -> MetricsOutcome {
        MetricsOutcome::NotIntegrated
    }

    /// Open rate and click rate over delivered mail, plus conversions
    fn score(&self, metrics: &PerformanceMetrics) -> f64 {
        let open_rate = ratio(metrics.opens.unwrap_or(0), metrics.delivered) * 100.0;
        let click_rate = ratio(metrics.clicks.unwrap_or(0), metrics.delivered) * 100.0;
        total(&[
            (open_rate * 0.6).min(40.0),
            (click_rate * 3.0).min(40.0),
            capped(metrics.conversions, 5.0, 20.0),
        ])
    }
}
