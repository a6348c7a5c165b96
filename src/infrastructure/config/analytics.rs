//! Analytics engine configuration.
//!
//! Controls which snapshot series the CLI reads and writes, how long a stored
//! snapshot stays fresh, and how often the scheduler recomputes every user.

use std::time::Duration;

use serde::Deserialize;

use crate::application::analytics::service::SnapshotPolicy;
use crate::domain::snapshot::DEFAULT_LABEL;

/// Upper bound for hour-valued settings (ten years).
pub const MAX_HOURS: u64 = 87_600;

/// Configuration for snapshot caching and scheduled recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalyticsConfig {
    /// Snapshot series label. Defaults to `default`.
    #[serde(default = "default_label")]
    pub label: String,

    /// Hours a stored snapshot is served before it is recomputed on read.
    /// Defaults to 24.
    #[serde(default = "default_freshness_hours")]
    pub freshness_hours: u64,

    /// Hours between scheduled recomputations of every user.
    /// Defaults to 24.
    #[serde(default = "default_recalculate_interval_hours")]
    pub recalculate_interval_hours: u64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            freshness_hours: default_freshness_hours(),
            recalculate_interval_hours: default_recalculate_interval_hours(),
        }
    }
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

const fn default_freshness_hours() -> u64 {
    24
}

const fn default_recalculate_interval_hours() -> u64 {
    24
}

impl AnalyticsConfig {
    /// Period of the recalculation scheduler.
    #[must_use]
    pub fn recalculate_interval(&self) -> Duration {
        Duration::from_secs(self.recalculate_interval_hours.saturating_mul(3600))
    }
}

impl From<&AnalyticsConfig> for SnapshotPolicy {
    fn from(config: &AnalyticsConfig) -> Self {
        let hours = i64::try_from(config.freshness_hours.min(MAX_HOURS)).unwrap_or(0);
        Self {
            label: config.label.clone(),
            freshness_window: chrono::Duration::hours(hours),
        }
    }
}
