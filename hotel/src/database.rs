//! SQLite connection setup and migration runner.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sqlx::{ConnectOptions, SqliteConnection};
use std::path::Path;
use std::str::FromStr;

use hotel_orm::{Gateway, PersistenceError};

/// A migrated connection to the hotel database.
pub struct Database {
    conn: SqliteConnection,
}

impl Database {
    /// Open (or create) the database at `path` and apply migrations.
    pub async fn open(path: &Path) -> Result<Self, PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let conn = options.connect().await?;
        let mut db = Self { conn };
        db.run_migrations().await?;
        tracing::debug!(path = %path.display(), "database opened");
        Ok(db)
    }

    /// Create a migrated in-memory database for testing.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn = SqliteConnectOptions::from_str("sqlite::memory:")?
            .connect()
            .await?;
        let mut db = Self { conn };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Run embedded migrations from `hotel/migrations/`.
    async fn run_migrations(&mut self) -> Result<(), PersistenceError> {
        sqlx::migrate!("./migrations")
            .run(&mut self.conn)
            .await
            .map_err(|e| PersistenceError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Hand the connection over to a persistence gateway.
    pub fn into_gateway(self) -> Gateway {
        Gateway::new(self.conn)
    }
}
