//! SQLite snapshot store.
//!
//! Snapshots are stored as a JSON payload keyed by user, label and report
//! date. Writing the same key again replaces the row.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;

use super::convert::{format_date, format_timestamp, parse_date, parse_timestamp};
use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::SnapshotRow;
use crate::adapter::outbound::sqlite::database::schema::analytics_snapshots;
use crate::domain::id::UserId;
use crate::domain::snapshot::{AnalyticsSnapshot, StoredSnapshot};
use crate::error::{Error, Result};
use crate::port::outbound::snapshot::SnapshotStore;

/// SQLite-backed snapshot store.
pub struct SqliteSnapshotStore {
    pool: DbPool,
}

impl SqliteSnapshotStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn to_row(
        user_id: &UserId,
        snapshot: &AnalyticsSnapshot,
        label: &str,
        report_date: NaiveDate,
    ) -> Result<SnapshotRow> {
        Ok(SnapshotRow {
            user_id: user_id.to_string(),
            label: label.to_string(),
            report_date: format_date(report_date),
            payload: serde_json::to_string(snapshot)?,
            calculated_at: format_timestamp(snapshot.generated_at),
        })
    }

    fn from_row(row: SnapshotRow) -> Result<StoredSnapshot> {
        let snapshot: AnalyticsSnapshot = serde_json::from_str(&row.payload)?;
        let calculated_at = parse_timestamp(&row.calculated_at).ok_or_else(|| {
            Error::Parse(format!("calculated_at: {:?}", row.calculated_at))
        })?;

        Ok(StoredSnapshot {
            user_id: UserId::from(row.user_id),
            label: row.label,
            report_date: parse_date("report_date", &row.report_date)?,
            snapshot,
            calculated_at,
        })
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn latest_snapshot(
        &self,
        user_id: &UserId,
        label: &str,
    ) -> Result<Option<StoredSnapshot>> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        let row: Option<SnapshotRow> = analytics_snapshots::table
            .filter(analytics_snapshots::user_id.eq(user_id.as_str()))
            .filter(analytics_snapshots::label.eq(label))
            .order_by((
                analytics_snapshots::calculated_at.desc(),
                analytics_snapshots::report_date.desc(),
            ))
            .select(SnapshotRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(Self::from_row).transpose()
    }

    async fn upsert_snapshot(
        &self,
        user_id: &UserId,
        snapshot: &AnalyticsSnapshot,
        label: &str,
        report_date: NaiveDate,
    ) -> Result<StoredSnapshot> {
        let row = Self::to_row(user_id, snapshot, label, report_date)?;
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;

        diesel::replace_into(analytics_snapshots::table)
            .values(&row)
            .execute(&mut conn)?;

        Ok(StoredSnapshot {
            user_id: user_id.clone(),
            label: label.to_string(),
            report_date,
            snapshot: snapshot.clone(),
            calculated_at: snapshot.generated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::open;
    use crate::application::analytics::aggregate;
    use crate::domain::trade::Trade;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn store() -> SqliteSnapshotStore {
        SqliteSnapshotStore::new(open(":memory:").unwrap())
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, day, hour, 0, 0).unwrap()
    }

    fn sample(generated_at: DateTime<Utc>) -> AnalyticsSnapshot {
        let opened = at(1, 9);
        let trades = vec![
            Trade::new(UserId::new("alice"), "SPY", opened)
                .with_credit(dec!(120.50))
                .closed(opened + Duration::days(4)),
            Trade::new(UserId::new("alice"), "QQQ", opened)
                .with_debit(dec!(40))
                .closed(opened + Duration::days(12)),
        ];
        aggregate(&trades, generated_at)
    }

    #[tokio::test]
    async fn missing_snapshot_is_none() {
        let store = store();
        let latest = store
            .latest_snapshot(&UserId::new("alice"), "default")
            .await
            .unwrap();
        assert!(latest.is_none());
    }

    #[tokio::test]
    async fn stored_payload_round_trips() {
        let store = store();
        let user = UserId::new("alice");
        let snapshot = sample(at(10, 8));

        let written = store
            .upsert_snapshot(&user, &snapshot, "default", at(10, 8).date_naive())
            .await
            .unwrap();
        let read = store.latest_snapshot(&user, "default").await.unwrap().unwrap();

        assert_eq!(read, written);
        assert_eq!(read.snapshot.totals.average_pnl.to_string(), "40.25");
    }

    #[tokio::test]
    async fn same_report_date_replaces_row() {
        let store = store();
        let user = UserId::new("alice");
        let date = at(10, 0).date_naive();

        store
            .upsert_snapshot(&user, &sample(at(10, 1)), "default", date)
            .await
            .unwrap();
        store
            .upsert_snapshot(&user, &AnalyticsSnapshot::empty(at(10, 5)), "default", date)
            .await
            .unwrap();

        let mut conn = store.pool.get().unwrap();
        let rows: i64 = analytics_snapshots::table
            .count()
            .get_result(&mut conn)
            .unwrap();
        drop(conn);
        assert_eq!(rows, 1);

        let latest = store.latest_snapshot(&user, "default").await.unwrap().unwrap();
        assert_eq!(latest.snapshot.totals.closed_trades, 0);
        assert_eq!(latest.calculated_at, at(10, 5));
    }

    #[tokio::test]
    async fn latest_is_chosen_by_calculation_time_within_label() {
        let store = store();
        let user = UserId::new("alice");

        for day in [11, 13, 12] {
            store
                .upsert_snapshot(&user, &sample(at(day, 6)), "default", at(day, 6).date_naive())
                .await
                .unwrap();
        }
        store
            .upsert_snapshot(&user, &sample(at(20, 6)), "weekly", at(20, 6).date_naive())
            .await
            .unwrap();

        let latest = store.latest_snapshot(&user, "default").await.unwrap().unwrap();
        assert_eq!(latest.report_date, at(13, 6).date_naive());
        assert_eq!(latest.label, "default");
    }

    #[tokio::test]
    async fn corrupt_payload_is_reported() {
        let store = store();
        let user = UserId::new("alice");
        store
            .upsert_snapshot(&user, &sample(at(10, 8)), "default", at(10, 8).date_naive())
            .await
            .unwrap();

        let mut conn = store.pool.get().unwrap();
        diesel::update(analytics_snapshots::table)
            .set(analytics_snapshots::payload.eq("{"))
            .execute(&mut conn)
            .unwrap();
        drop(conn);

        let result = store.latest_snapshot(&user, "default").await;
        assert!(matches!(result, Err(Error::Json(_))));
    }
}
