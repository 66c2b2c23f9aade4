pub mod error;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;
pub mod store;

#[cfg(test)]
mod conformance;

use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

pub use error::{Entity, Result, StoreError};
pub use memory::MemoryStore;
pub use store::{CommentStore, SeedReport};

/// SQLite-backed store. One connection behind a mutex, so every store
/// operation (including id assignment) runs serialized.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        let db = Self::init(conn)?;
        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| StoreError::StorageUnavailable(format!("DB lock poisoned: {}", e)))?;
        f(&conn)
    }
}
