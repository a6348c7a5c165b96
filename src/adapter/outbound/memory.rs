//! In-memory journal and snapshot store.
//!
//! Used by tests and by callers that want the analytics engine without a
//! database behind it.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;

use crate::domain::id::UserId;
use crate::domain::snapshot::{AnalyticsSnapshot, StoredSnapshot};
use crate::domain::trade::Trade;
use crate::error::Result;
use crate::port::outbound::snapshot::SnapshotStore;
use crate::port::outbound::trade::{TradeRepository, UserDirectory};

/// In-memory trade journal.
///
/// Trades are kept in insertion order; a user is known once registered or
/// once any of their trades is inserted.
#[derive(Debug, Default)]
pub struct InMemoryJournal {
    trades: RwLock<Vec<Trade>>,
    users: RwLock<BTreeSet<UserId>>,
}

impl InMemoryJournal {
    /// Create a new empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a user with no trades.
    pub fn register(&self, user_id: UserId) {
        self.users.write().insert(user_id);
    }

    /// Record a trade, registering its owner.
    pub fn insert(&self, trade: Trade) {
        self.users.write().insert(trade.user_id.clone());
        self.trades.write().push(trade);
    }

    /// Number of trades across all users.
    pub fn len(&self) -> usize {
        self.trades.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TradeRepository for InMemoryJournal {
    async fn list_trades(&self, user_id: &UserId) -> Result<Vec<Trade>> {
        let mut trades: Vec<Trade> = self
            .trades
            .read()
            .iter()
            .filter(|t| &t.user_id == user_id)
            .cloned()
            .collect();
        // Stable: ties keep insertion order.
        trades.sort_by_key(|t| t.opened_at);
        Ok(trades)
    }
}

#[async_trait]
impl UserDirectory for InMemoryJournal {
    async fn list_users(&self) -> Result<Vec<UserId>> {
        Ok(self.users.read().iter().cloned().collect())
    }
}

type SnapshotKey = (UserId, String, NaiveDate);

/// In-memory snapshot store keyed by (user, label, report date).
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    rows: RwLock<BTreeMap<SnapshotKey, StoredSnapshot>>,
}

impl InMemorySnapshotStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshot rows.
    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn latest_snapshot(
        &self,
        user_id: &UserId,
        label: &str,
    ) -> Result<Option<StoredSnapshot>> {
        let rows = self.rows.read();
        Ok(rows
            .values()
            .filter(|row| &row.user_id == user_id && row.label == label)
            .max_by(|a, b| {
                a.calculated_at
                    .cmp(&b.calculated_at)
                    .then(a.report_date.cmp(&b.report_date))
            })
            .cloned())
    }

    async fn upsert_snapshot(
        &self,
        user_id: &UserId,
        snapshot: &AnalyticsSnapshot,
        label: &str,
        report_date: NaiveDate,
    ) -> Result<StoredSnapshot> {
        let stored = StoredSnapshot {
            user_id: user_id.clone(),
            label: label.to_string(),
            report_date,
            snapshot: snapshot.clone(),
            calculated_at: snapshot.generated_at,
        };
        self.rows.write().insert(
            (user_id.clone(), label.to_string(), report_date),
            stored.clone(),
        );
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn at(day: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn list_trades_filters_by_user_and_orders_by_open() {
        let journal = InMemoryJournal::new();
        let alice = UserId::new("alice");
        journal.insert(Trade::new(alice.clone(), "SPY", at(5)));
        journal.insert(Trade::new(UserId::new("bob"), "QQQ", at(1)));
        journal.insert(Trade::new(alice.clone(), "IWM", at(2)));

        let trades = journal.list_trades(&alice).await.unwrap();
        let symbols: Vec<_> = trades.iter().map(|t| t.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["IWM", "SPY"]);
    }

    #[tokio::test]
    async fn unknown_user_has_no_trades() {
        let journal = InMemoryJournal::new();
        let trades = journal.list_trades(&UserId::new("ghost")).await.unwrap();
        assert!(trades.is_empty());
    }

    #[tokio::test]
    async fn users_are_listed_once_in_order() {
        let journal = InMemoryJournal::new();
        journal.register(UserId::new("carol"));
        journal.insert(Trade::new(UserId::new("alice"), "SPY", at(1)));
        journal.insert(Trade::new(UserId::new("alice"), "SPY", at(2)));

        let users = journal.list_users().await.unwrap();
        assert_eq!(users, vec![UserId::new("alice"), UserId::new("carol")]);
    }

    #[tokio::test]
    async fn upsert_same_date_overwrites() {
        let store = InMemorySnapshotStore::new();
        let user = UserId::new("alice");
        let date = at(1).date_naive();

        store
            .upsert_snapshot(&user, &AnalyticsSnapshot::empty(at(1)), "default", date)
            .await
            .unwrap();
        let later = at(1) + Duration::hours(3);
        store
            .upsert_snapshot(&user, &AnalyticsSnapshot::empty(later), "default", date)
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let latest = store.latest_snapshot(&user, "default").await.unwrap().unwrap();
        assert_eq!(latest.calculated_at, later);
    }

    #[tokio::test]
    async fn latest_picks_most_recent_calculation_per_label() {
        let store = InMemorySnapshotStore::new();
        let user = UserId::new("alice");

        for day in [1, 3, 2] {
            store
                .upsert_snapshot(
                    &user,
                    &AnalyticsSnapshot::empty(at(day)),
                    "default",
                    at(day).date_naive(),
                )
                .await
                .unwrap();
        }
        store
            .upsert_snapshot(&user, &AnalyticsSnapshot::empty(at(9)), "weekly", at(9).date_naive())
            .await
            .unwrap();

        let latest = store.latest_snapshot(&user, "default").await.unwrap().unwrap();
        assert_eq!(latest.report_date, at(3).date_naive());
        assert!(store
            .latest_snapshot(&UserId::new("bob"), "default")
            .await
            .unwrap()
            .is_none());
    }
}
