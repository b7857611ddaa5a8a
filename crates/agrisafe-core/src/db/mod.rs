//! Database layer for AgriSafe.

mod schema;
mod migration;
mod shops;
mod doctors;
mod farmers;
mod recommendations;
mod items;
mod seed;

pub use schema::*;
pub use migration::*;
pub use seed::*;

use rusqlite::{Connection, ErrorCode, OpenFlags};
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Recommendation {0} is already claimed")]
    AlreadyClaimed(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<rusqlite::Error> for DbError {
    /// Constraint failures and missing columns get their own variants so
    /// callers can tell them apart from engine errors.
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) if e.code == ErrorCode::ConstraintViolation => {
                DbError::Constraint(msg.clone().unwrap_or_else(|| e.to_string()))
            }
            rusqlite::Error::SqliteFailure(_, Some(msg)) if is_missing_column(msg) => {
                DbError::ColumnNotFound(msg.clone())
            }
            // Statements rejected at prepare time carry the message here instead.
            rusqlite::Error::SqlInputError { msg, .. } if is_missing_column(msg) => {
                DbError::ColumnNotFound(msg.clone())
            }
            _ => DbError::Sqlite(err),
        }
    }
}

fn is_missing_column(msg: &str) -> bool {
    msg.starts_with("no such column")
}

pub type DbResult<T> = Result<T, DbError>;

/// Text form of a timestamp as stored in `claimed_at`; matches the
/// `datetime('now')` layout so string comparison orders correctly.
pub(crate) fn sql_datetime(at: chrono::NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating it and the cascading schema if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::open_with_variant(path, SchemaVariant::Cascading)
    }

    /// Open database at path and apply the given schema variant.
    ///
    /// With [`SchemaVariant::Strict`] this fails when the tables already exist.
    pub fn open_with_variant<P: AsRef<Path>>(path: P, variant: SchemaVariant) -> DbResult<Self> {
        let db = Self::connect(path)?;
        db.apply_schema(variant)?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open_in_memory_with_variant(SchemaVariant::Cascading)
    }

    /// Create in-memory database with the given schema variant.
    pub fn open_in_memory_with_variant(variant: SchemaVariant) -> DbResult<Self> {
        let db = Self::connect_in_memory()?;
        db.apply_schema(variant)?;
        Ok(db)
    }

    /// Open database at path without touching the schema.
    pub fn connect<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an existing database file; fails instead of creating a new one.
    pub fn connect_existing<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Self::from_connection(Connection::open_with_flags(path, flags)?)
    }

    /// Empty in-memory database without any schema.
    pub fn connect_in_memory() -> DbResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self { conn })
    }

    /// Execute the DDL for `variant`.
    pub fn apply_schema(&self, variant: SchemaVariant) -> DbResult<()> {
        log::debug!("Applying {} schema", variant);
        self.conn.execute_batch(variant.sql())?;
        log::info!("Applied {} schema ({} tables)", variant, TABLES.len());
        Ok(())
    }

    /// Names of user tables, sorted.
    pub fn table_names(&self) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Column names of `table` in declaration order; empty if the table is absent.
    pub fn table_columns(&self, table: &str) -> DbResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
        let rows = stmt.query_map([table], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction on the shared connection.
    ///
    /// Data-access methods called on `self` while the guard is alive run
    /// inside it; dropping the guard without `commit` rolls back.
    pub(crate) fn transaction(&self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }
}
