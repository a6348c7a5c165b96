use std::path::{Path, PathBuf};

use diesel::prelude::*;
use strikebook::adapter::outbound::sqlite::{open, DbPool};
use tempfile::TempDir;

/// File-backed SQLite database removed when dropped.
pub struct TempDb {
    _dir: TempDir,
    path: PathBuf,
    pool: DbPool,
}

impl TempDb {
    pub fn create() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("strikebook.db");

        let url = format!("sqlite://{}", path.display());
        let pool = open(&url).expect("open sqlite database");

        // WAL mode improves concurrent writer behavior in tests.
        {
            let mut conn = pool.get().expect("get sqlite connection");
            diesel::sql_query("PRAGMA journal_mode=WAL")
                .execute(&mut conn)
                .expect("enable WAL mode");
        }

        Self {
            _dir: dir,
            path,
            pool,
        }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
