//! SQLite persistence adapters.
//!
//! Provides the Diesel-backed trade journal and snapshot store.

mod convert;
pub mod database;
pub mod snapshot;
pub mod trade;

pub use database::connection::{create_pool, open, run_migrations, DbPool};
pub use snapshot::SqliteSnapshotStore;
pub use trade::SqliteTradeRepository;
