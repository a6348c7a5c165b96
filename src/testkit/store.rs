//! SQLite-backed fixtures.

use std::sync::Arc;

use crate::adapter::outbound::sqlite::{open, DbPool, SqliteSnapshotStore, SqliteTradeRepository};
use crate::application::analytics::service::{SnapshotPolicy, SnapshotService};
use crate::port::outbound::clock::Clock;

/// Fresh migrated in-memory database.
pub fn memory_pool() -> DbPool {
    open(":memory:").unwrap_or_else(|e| panic!("in-memory database: {e}"))
}

/// Journal and snapshot store sharing one pool, wired into a service.
pub struct SqliteFixture {
    pub journal: Arc<SqliteTradeRepository>,
    pub store: Arc<SqliteSnapshotStore>,
    pub service: SnapshotService,
}

impl SqliteFixture {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        let journal = Arc::new(SqliteTradeRepository::new(pool.clone()));
        let store = Arc::new(SqliteSnapshotStore::new(pool));
        let service = SnapshotService::new(
            journal.clone(),
            journal.clone(),
            store.clone(),
            SnapshotPolicy::default(),
        )
        .with_clock(clock);
        Self {
            journal,
            store,
            service,
        }
    }

    pub fn in_memory(clock: Arc<dyn Clock>) -> Self {
        Self::new(memory_pool(), clock)
    }
}
