//! Analytics snapshot value types.
//!
//! An [`AnalyticsSnapshot`] is produced whole by the aggregator and never
//! mutated afterwards. A [`StoredSnapshot`] is the persisted copy keyed by
//! (user, label, report date). [`SnapshotState`] names the cache states the
//! snapshot service moves between.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::archetype::Archetype;
use super::id::UserId;
use super::money::round_money;

/// Label used when callers do not ask for a specific snapshot series.
pub const DEFAULT_LABEL: &str = "default";

/// Aggregate performance figures over closed trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub closed_trades: u64,
    pub win_rate: Decimal,
    pub average_pnl: Decimal,
    pub average_pnl_pct: Decimal,
    pub expectancy: Decimal,
    pub average_hold_days: Decimal,
}

impl Totals {
    /// Totals over an empty closed-trade set.
    #[must_use]
    pub fn zero() -> Self {
        let zero = round_money(Decimal::ZERO);
        Self {
            closed_trades: 0,
            win_rate: zero,
            average_pnl: zero,
            average_pnl_pct: zero,
            expectancy: zero,
            average_hold_days: zero,
        }
    }
}

/// Per-archetype performance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyBreakdown {
    pub strategy: Archetype,
    pub total: u64,
    pub wins: u64,
    pub losses: u64,
    pub average_pnl: Decimal,
}

/// Cumulative realized P&L after one closed trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub cumulative_pnl: Decimal,
}

/// Holding-period bucket boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldingPeriod {
    #[serde(rename = "0-3d")]
    UpToThreeDays,
    #[serde(rename = "4-7d")]
    UpToSevenDays,
    #[serde(rename = "8-30d")]
    UpToThirtyDays,
    #[serde(rename = "31d+")]
    OverThirtyDays,
}

impl HoldingPeriod {
    /// All buckets in reporting order.
    pub const ALL: [Self; 4] = [
        Self::UpToThreeDays,
        Self::UpToSevenDays,
        Self::UpToThirtyDays,
        Self::OverThirtyDays,
    ];

    /// Bucket for a whole number of holding days.
    #[must_use]
    pub const fn for_days(days: i64) -> Self {
        if days <= 3 {
            Self::UpToThreeDays
        } else if days <= 7 {
            Self::UpToSevenDays
        } else if days <= 30 {
            Self::UpToThirtyDays
        } else {
            Self::OverThirtyDays
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UpToThreeDays => "0-3d",
            Self::UpToSevenDays => "4-7d",
            Self::UpToThirtyDays => "8-30d",
            Self::OverThirtyDays => "31d+",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::UpToThreeDays => 0,
            Self::UpToSevenDays => 1,
            Self::UpToThirtyDays => 2,
            Self::OverThirtyDays => 3,
        }
    }
}

/// Count of closed trades in one holding-period bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingBucket {
    pub label: HoldingPeriod,
    pub count: u64,
}

/// Fixed-size tally of holding periods, always reporting all four buckets.
#[derive(Debug, Clone, Copy, Default)]
pub struct HoldingTally([u64; 4]);

impl HoldingTally {
    pub fn record(&mut self, days: i64) {
        self.0[HoldingPeriod::for_days(days).index()] += 1;
    }

    #[must_use]
    pub fn into_buckets(self) -> Vec<HoldingBucket> {
        HoldingPeriod::ALL
            .iter()
            .map(|period| HoldingBucket {
                label: *period,
                count: self.0[period.index()],
            })
            .collect()
    }
}

/// Point-in-time portfolio analytics for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    pub generated_at: DateTime<Utc>,
    pub totals: Totals,
    pub strategy_breakdown: Vec<StrategyBreakdown>,
    pub equity_curve: Vec<EquityPoint>,
    pub holding_periods: Vec<HoldingBucket>,
}

impl AnalyticsSnapshot {
    /// Snapshot of a history with no closed trades.
    #[must_use]
    pub fn empty(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            totals: Totals::zero(),
            strategy_breakdown: Vec::new(),
            equity_curve: Vec::new(),
            holding_periods: HoldingTally::default().into_buckets(),
        }
    }
}

/// Persisted snapshot keyed by (user, label, report date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSnapshot {
    pub user_id: UserId,
    pub label: String,
    pub report_date: NaiveDate,
    pub snapshot: AnalyticsSnapshot,
    pub calculated_at: DateTime<Utc>,
}

impl StoredSnapshot {
    /// Time elapsed since the snapshot was calculated.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.calculated_at
    }

    /// Wrap into the outward response shape.
    #[must_use]
    pub fn into_summary(self, refreshed: bool) -> SnapshotSummary {
        SnapshotSummary {
            data: self.snapshot,
            report_date: self.report_date,
            calculated_at: self.calculated_at,
            refreshed,
        }
    }
}

/// Cache state of a user's latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotState {
    /// No snapshot has been stored for this user and label.
    Absent,
    /// Stored snapshot is within the freshness window.
    Fresh(StoredSnapshot),
    /// Stored snapshot is older than the freshness window.
    Stale(StoredSnapshot),
}

impl SnapshotState {
    /// Classify a looked-up snapshot against the freshness window.
    ///
    /// A snapshot becomes stale once its age exceeds `window`.
    #[must_use]
    pub fn assess(stored: Option<StoredSnapshot>, now: DateTime<Utc>, window: Duration) -> Self {
        match stored {
            None => Self::Absent,
            Some(snapshot) if snapshot.age(now) > window => Self::Stale(snapshot),
            Some(snapshot) => Self::Fresh(snapshot),
        }
    }

    /// True when the next read must recompute.
    #[must_use]
    pub const fn needs_refresh(&self) -> bool {
        !matches!(self, Self::Fresh(_))
    }
}

/// Outward response of the snapshot service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub data: AnalyticsSnapshot,
    pub report_date: NaiveDate,
    pub calculated_at: DateTime<Utc>,
    pub refreshed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn stored(calculated_at: DateTime<Utc>) -> StoredSnapshot {
        StoredSnapshot {
            user_id: UserId::new("u1"),
            label: DEFAULT_LABEL.to_string(),
            report_date: calculated_at.date_naive(),
            snapshot: AnalyticsSnapshot::empty(calculated_at),
            calculated_at,
        }
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(HoldingPeriod::for_days(0), HoldingPeriod::UpToThreeDays);
        assert_eq!(HoldingPeriod::for_days(3), HoldingPeriod::UpToThreeDays);
        assert_eq!(HoldingPeriod::for_days(4), HoldingPeriod::UpToSevenDays);
        assert_eq!(HoldingPeriod::for_days(7), HoldingPeriod::UpToSevenDays);
        assert_eq!(HoldingPeriod::for_days(8), HoldingPeriod::UpToThirtyDays);
        assert_eq!(HoldingPeriod::for_days(30), HoldingPeriod::UpToThirtyDays);
        assert_eq!(HoldingPeriod::for_days(31), HoldingPeriod::OverThirtyDays);
    }

    #[test]
    fn empty_tally_reports_all_buckets_in_order() {
        let buckets = HoldingTally::default().into_buckets();
        let labels: Vec<_> = buckets.iter().map(|b| b.label.label()).collect();
        assert_eq!(labels, vec!["0-3d", "4-7d", "8-30d", "31d+"]);
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn bucket_label_serializes_as_range_text() {
        let json = serde_json::to_string(&HoldingPeriod::OverThirtyDays).unwrap();
        assert_eq!(json, "\"31d+\"");
    }

    #[test]
    fn state_absent_without_snapshot() {
        let state = SnapshotState::assess(None, at(12), Duration::hours(24));
        assert_eq!(state, SnapshotState::Absent);
        assert!(state.needs_refresh());
    }

    #[test]
    fn state_fresh_within_window() {
        let state = SnapshotState::assess(Some(stored(at(0))), at(23), Duration::hours(24));
        assert!(matches!(state, SnapshotState::Fresh(_)));
        assert!(!state.needs_refresh());
    }

    #[test]
    fn state_stale_after_window() {
        let calculated = at(0);
        let now = calculated + Duration::hours(24) + Duration::seconds(1);
        let state = SnapshotState::assess(Some(stored(calculated)), now, Duration::hours(24));
        assert!(matches!(state, SnapshotState::Stale(_)));
        assert!(state.needs_refresh());
    }

    #[test]
    fn summary_serializes_camel_case_fields() {
        let summary = stored(at(1)).into_summary(true);
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["refreshed"], true);
        assert_eq!(value["reportDate"], "2024-05-01");
        assert!(value["data"]["holdingPeriods"].is_array());
        assert!(value["data"]["totals"]["closedTrades"].is_number());
    }
}
