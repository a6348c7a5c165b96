//! Snapshot service: read-through cache over the metric aggregator.
//!
//! # State machine
//!
//! ```text
//! Absent ──get_summary──▶ Fresh ──(freshness window elapses)──▶ Stale
//!                           ▲                                    │
//!                           └────────────get_summary─────────────┘
//! force_recalculate: any state ──▶ Fresh
//! ```
//!
//! Recomputations upsert on (user, label, report date), so concurrent
//! recomputations for one user converge on the same row.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use super::aggregator::aggregate;
use crate::domain::id::UserId;
use crate::domain::snapshot::{SnapshotState, SnapshotSummary, DEFAULT_LABEL};
use crate::error::Result;
use crate::port::outbound::clock::{Clock, SystemClock};
use crate::port::outbound::snapshot::SnapshotStore;
use crate::port::outbound::trade::{TradeRepository, UserDirectory};

/// Caching policy for the snapshot service.
#[derive(Debug, Clone)]
pub struct SnapshotPolicy {
    /// Snapshot series label read and written by the service.
    pub label: String,
    /// Age after which a stored snapshot is recomputed on read.
    pub freshness_window: Duration,
}

impl Default for SnapshotPolicy {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            freshness_window: Duration::hours(24),
        }
    }
}

/// Outcome of a batch recomputation across all users.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Users whose snapshot was recomputed and stored.
    pub succeeded: usize,
    /// Users whose recomputation failed, with the error message.
    pub failed: Vec<(UserId, String)>,
}

impl BatchReport {
    /// True when every user was recomputed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total users attempted.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

/// Orchestrates cache lookups, recomputation and persistence of snapshots.
pub struct SnapshotService {
    trades: Arc<dyn TradeRepository>,
    users: Arc<dyn UserDirectory>,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    policy: SnapshotPolicy,
}

impl SnapshotService {
    /// Create a service using wall-clock time.
    pub fn new(
        trades: Arc<dyn TradeRepository>,
        users: Arc<dyn UserDirectory>,
        store: Arc<dyn SnapshotStore>,
        policy: SnapshotPolicy,
    ) -> Self {
        Self {
            trades,
            users,
            store,
            clock: Arc::new(SystemClock),
            policy,
        }
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn policy(&self) -> &SnapshotPolicy {
        &self.policy
    }

    /// Current cache state of the user's snapshot.
    ///
    /// # Errors
    ///
    /// Propagates snapshot store failures.
    pub async fn state(&self, user_id: &UserId) -> Result<SnapshotState> {
        let latest = self
            .store
            .latest_snapshot(user_id, &self.policy.label)
            .await?;
        Ok(SnapshotState::assess(
            latest,
            self.clock.now(),
            self.policy.freshness_window,
        ))
    }

    /// Return the cached snapshot, recomputing when absent or stale.
    ///
    /// # Errors
    ///
    /// Propagates trade repository and snapshot store failures.
    pub async fn get_summary(&self, user_id: &UserId) -> Result<SnapshotSummary> {
        match self.state(user_id).await? {
            SnapshotState::Fresh(stored) => {
                debug!(user_id = %user_id, report_date = %stored.report_date, "Snapshot cache hit");
                Ok(stored.into_summary(false))
            }
            SnapshotState::Stale(stored) => {
                debug!(
                    user_id = %user_id,
                    age_minutes = stored.age(self.clock.now()).num_minutes(),
                    "Snapshot stale"
                );
                self.recompute(user_id).await
            }
            SnapshotState::Absent => {
                debug!(user_id = %user_id, "No snapshot stored");
                self.recompute(user_id).await
            }
        }
    }

    /// Recompute and store the snapshot regardless of cache state.
    ///
    /// # Errors
    ///
    /// Propagates trade repository and snapshot store failures.
    pub async fn force_recalculate(&self, user_id: &UserId) -> Result<SnapshotSummary> {
        self.recompute(user_id).await
    }

    /// Recompute every user's snapshot, isolating per-user failures.
    ///
    /// # Errors
    ///
    /// Returns an error only if the user list itself cannot be loaded.
    pub async fn recalculate_all_users(&self) -> Result<BatchReport> {
        let users = self.users.list_users().await?;
        let mut report = BatchReport::default();

        for user_id in users {
            match self.recompute(&user_id).await {
                Ok(_) => report.succeeded += 1,
                Err(e) => {
                    warn!(user_id = %user_id, error = %e, "Snapshot recalculation failed");
                    report.failed.push((user_id, e.to_string()));
                }
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "Batch snapshot recalculation complete"
        );
        Ok(report)
    }

    async fn recompute(&self, user_id: &UserId) -> Result<SnapshotSummary> {
        let trades = self.trades.list_trades(user_id).await?;
        let now = self.clock.now();
        let snapshot = aggregate(&trades, now);

        let stored = self
            .store
            .upsert_snapshot(user_id, &snapshot, &self.policy.label, now.date_naive())
            .await?;

        info!(
            user_id = %user_id,
            closed_trades = stored.snapshot.totals.closed_trades,
            report_date = %stored.report_date,
            "Snapshot recalculated"
        );
        Ok(stored.into_summary(true))
    }
}
