//! Unit of work: one connection, at most one transaction
//!
//! Nested `begin_transaction` calls only bump a counter. The matching number
//! of `commit` calls is needed before `COMMIT` is sent. `rollback` always
//! unwinds the whole transaction no matter how deep the nesting is.

use std::str::FromStr;
use std::time::Duration;

use gesn_core::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqliteSynchronous};
use sqlx::Connection;
use tracing::{debug, warn};

use crate::{DataError, Result};

/// Owns a single SQLite connection and its transaction nesting depth.
///
/// Not meant to be shared between tasks: every operation takes `&mut self`.
pub struct UnitOfWork {
    conn: SqliteConnection,
    depth: u32,
}

impl UnitOfWork {
    /// Open a connection using the configured URL.
    ///
    /// File databases get WAL journaling, foreign keys and the configured
    /// busy timeout. The parent directory is created when missing.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(config.busy_timeout_secs))
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        // Ensure parent directory exists
        if let Some(parent) = options
            .get_filename()
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DataError::Database(sqlx::Error::Io(e)))?;
        }

        Self::connect_with(&options).await
    }

    /// Open a connection with explicit driver options.
    pub async fn connect_with(options: &SqliteConnectOptions) -> Result<Self> {
        let conn = SqliteConnection::connect_with(options).await?;
        Ok(Self::from_connection(conn))
    }

    /// Private in-memory database, gone when the unit of work closes.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        Self::connect_with(&options).await
    }

    /// Wrap an already open connection. No transaction is assumed active.
    pub fn from_connection(conn: SqliteConnection) -> Self {
        Self { conn, depth: 0 }
    }

    /// The live connection. Statements run here join the open transaction.
    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    pub fn in_transaction(&self) -> bool {
        self.depth > 0
    }

    /// Current nesting depth, 0 when no transaction is open.
    pub fn transaction_depth(&self) -> u32 {
        self.depth
    }

    /// Open a transaction, or join the open one by bumping the depth.
    pub async fn begin_transaction(&mut self) -> Result<()> {
        if self.depth == 0 {
            sqlx::raw_sql("BEGIN").execute(&mut self.conn).await?;
            debug!("transaction started");
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one nesting level; only the outermost level sends `COMMIT`.
    ///
    /// If the physical commit fails the transaction is rolled back and the
    /// commit error is returned.
    pub async fn commit(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(DataError::NoActiveTransaction);
        }

        self.depth -= 1;
        if self.depth > 0 {
            debug!(depth = self.depth, "nested commit deferred");
            return Ok(());
        }

        match sqlx::raw_sql("COMMIT").execute(&mut self.conn).await {
            Ok(_) => {
                debug!("transaction committed");
                Ok(())
            }
            Err(err) => {
                if let Err(rollback_err) = self.discard().await {
                    warn!(error = %rollback_err, "rollback after failed commit also failed");
                }
                Err(err.into())
            }
        }
    }

    /// Discard the whole transaction and reset nesting to zero.
    ///
    /// A no-op when nothing is open.
    pub async fn rollback(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Ok(());
        }

        self.discard().await
    }

    async fn discard(&mut self) -> Result<()> {
        let depth = self.depth;
        self.depth = 0;
        sqlx::raw_sql("ROLLBACK").execute(&mut self.conn).await?;
        debug!(depth, "transaction rolled back");
        Ok(())
    }

    /// Roll back anything pending, then close the connection.
    ///
    /// Dropping a unit of work without calling this still closes the
    /// connection, and SQLite discards the uncommitted transaction with it.
    pub async fn close(mut self) -> Result<()> {
        if self.in_transaction() {
            warn!(depth = self.depth, "closing unit of work with an open transaction");
            self.rollback().await?;
        }
        self.conn.close().await?;
        Ok(())
    }
}
