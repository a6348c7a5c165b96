//! Persistence port for computed analytics snapshots.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{id::UserId, snapshot::AnalyticsSnapshot, snapshot::StoredSnapshot};
use crate::error::Result;

/// Storage operations for analytics snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Latest snapshot for (user, label) by calculation time, if any.
    async fn latest_snapshot(&self, user_id: &UserId, label: &str)
        -> Result<Option<StoredSnapshot>>;

    /// Insert or overwrite the snapshot for (user, label, report date).
    ///
    /// The stored calculation timestamp is the snapshot's `generated_at`.
    async fn upsert_snapshot(
        &self,
        user_id: &UserId,
        snapshot: &AnalyticsSnapshot,
        label: &str,
        report_date: NaiveDate,
    ) -> Result<StoredSnapshot>;
}
