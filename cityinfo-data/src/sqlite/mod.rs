//! SQLite-backed entity store.
//!
//! Each unit of work is an `IMMEDIATE` transaction: it takes the database
//! write lock when it begins, so an existence check and the write that
//! depends on it cannot interleave with another writer.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cityinfo_core::EntityStore;
use log::debug;
use rusqlite::{Connection, Error as SqliteError, TransactionBehavior};
use thiserror::Error;

use crate::fs::ensure_parent_dir;

mod schema;
mod unit;

pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
pub use unit::SqliteUnitOfWork;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised by [`SqliteStore`] and its units of work.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Failed to create the parent directory for the database file.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Database path whose parent could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}")]
    Open {
        /// Database path.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Configuring the connection failed.
    #[error("failed to configure SQLite connection")]
    Configure {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The schema could not be initialised.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// Beginning a unit of work failed.
    #[error("failed to begin unit of work")]
    Begin {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A read or write statement failed.
    #[error("failed to {operation}")]
    Statement {
        /// What the statement was doing.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A write targeted a row that does not exist.
    #[error("{table} row {id} does not exist")]
    MissingRow {
        /// Table that was written.
        table: &'static str,
        /// Identifier of the missing row.
        id: i64,
    },
    /// Committing a unit of work failed.
    #[error("failed to commit unit of work")]
    Commit {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
}

/// [`EntityStore`] persisted in a SQLite database.
///
/// # Examples
/// ```
/// use cityinfo_core::{CityFilter, EntityStore, UnitOfWork, seed};
/// use cityinfo_data::SqliteStore;
///
/// # fn main() -> Result<(), cityinfo_data::SqliteStoreError> {
/// let mut store = SqliteStore::open_in_memory()?;
/// seed::seed_catalogue(&mut store)?;
/// let unit = store.begin()?;
/// assert_eq!(unit.count_cities(&CityFilter::new(None, Some("TOWER")))?, 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and initialise its
    /// schema.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the directory, connection or schema
    /// cannot be prepared.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteStoreError> {
        ensure_parent_dir(path).map_err(|source| SqliteStoreError::CreateDirectory {
            path: path.to_path_buf(),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| SqliteStoreError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("opened city database at {path}");
        Self::from_connection(connection)
    }

    /// Open a private in-memory database with the schema initialised.
    ///
    /// # Errors
    /// Returns [`SqliteStoreError`] when the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, SqliteStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteStoreError::Open {
                path: Utf8PathBuf::from(":memory:"),
                source,
            })?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self, SqliteStoreError> {
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(|source| SqliteStoreError::Configure { source })?;
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }
}

impl EntityStore for SqliteStore {
    type Error = SqliteStoreError;
    type Unit<'a> = SqliteUnitOfWork<'a>;

    fn begin(&mut self) -> Result<Self::Unit<'_>, Self::Error> {
        let transaction = self
            .connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|source| SqliteStoreError::Begin { source })?;
        Ok(SqliteUnitOfWork::new(transaction))
    }
}
