//! Wiring of the SQLite adapters into the snapshot service for CLI handlers.

use std::path::Path;
use std::sync::Arc;

use crate::adapter::outbound::sqlite::{open, SqliteSnapshotStore, SqliteTradeRepository};
use crate::application::analytics::service::{SnapshotPolicy, SnapshotService};
use crate::infrastructure::config::settings::Config;
use crate::error::Result;

/// Build a sqlite database URL from a filesystem path.
#[must_use]
pub fn sqlite_database_url(path: &Path) -> String {
    format!("sqlite://{}", path.display())
}

/// Everything a command needs, opened against one database.
pub struct Context {
    pub config: Config,
    pub journal: Arc<SqliteTradeRepository>,
    pub service: Arc<SnapshotService>,
}

impl Context {
    /// Open the database named by `db` (or the configured one) and migrate it.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(config: Config, db: Option<&Path>) -> Result<Self> {
        let url = sqlite_database_url(db.unwrap_or_else(|| Path::new(&config.database)));
        let pool = open(&url)?;

        let journal = Arc::new(SqliteTradeRepository::new(pool.clone()));
        let store = Arc::new(SqliteSnapshotStore::new(pool));
        let service = SnapshotService::new(
            journal.clone(),
            journal.clone(),
            store,
            SnapshotPolicy::from(&config.analytics),
        );

        Ok(Self {
            config,
            journal,
            service: Arc::new(service),
        })
    }
}
