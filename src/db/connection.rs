use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use super::DbError;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Hands out a fresh connection for each unit of work.
///
/// The connection is owned by the caller and closed when dropped.
pub trait ConnectionProvider {
    fn connect(&self) -> Result<Connection, DbError>;
}

/// Opens a new connection to a SQLite database file on every call.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        // Off by default in SQLite; child rows rely on ON DELETE CASCADE.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }
}

impl ConnectionProvider for SqliteConnector {
    fn connect(&self) -> Result<Connection, DbError> {
        self.open().map_err(|source| DbError::Connection {
            target: self.path.display().to_string(),
            source,
        })
    }
}
