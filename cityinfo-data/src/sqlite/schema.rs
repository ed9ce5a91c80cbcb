//! Schema creation and versioning for the city database.

use rusqlite::{Connection, Error as SqliteError, OptionalExtension, Transaction};
use thiserror::Error;

/// Schema version written by this crate.
pub const SCHEMA_VERSION: i64 = 1;

/// Errors raised when initialising the city schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Enabling SQLite foreign keys failed.
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// A migration statement failed.
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Short description of the failing step.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// The database was written by a different schema version.
    #[error("expected city schema version {expected} but found {found}; apply migrations before retrying")]
    VersionMismatch {
        /// Version this crate understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
}

/// Create the city tables, indexes and version marker if missing.
///
/// Foreign keys are enabled on `connection`. Points of interest reference
/// their city with `ON DELETE RESTRICT`, so the database refuses to remove a
/// city that still owns children.
///
/// # Errors
/// Returns [`SchemaError`] when a step fails or the recorded version differs
/// from [`SCHEMA_VERSION`].
///
/// # Examples
/// ```
/// use cityinfo_data::initialise_schema;
/// use rusqlite::Connection;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create city schema");
/// initialise_schema(&mut conn).expect("initialisation is idempotent");
///
/// let version: i64 = conn
///     .query_row("SELECT version FROM cityinfo_schema_version", [], |row| row.get(0))
///     .expect("read schema version");
/// assert_eq!(version, 1);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| SchemaError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create cities",
        "CREATE TABLE IF NOT EXISTS cities (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            description TEXT
        )",
    )?;
    run_migration_step(
        transaction,
        "create points_of_interest",
        "CREATE TABLE IF NOT EXISTS points_of_interest (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            city_id INTEGER NOT NULL,
            name TEXT NOT NULL CHECK (length(trim(name)) > 0),
            description TEXT,
            FOREIGN KEY (city_id) REFERENCES cities(id) ON DELETE RESTRICT
        )",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "index cities by name",
        "CREATE INDEX IF NOT EXISTS idx_cities_name ON cities(name, id)",
    )?;
    run_migration_step(
        transaction,
        "index points_of_interest by city",
        "CREATE INDEX IF NOT EXISTS idx_points_of_interest_city
            ON points_of_interest(city_id, id)",
    )
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS cityinfo_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing: Option<i64> = transaction
        .query_row(
            "SELECT version FROM cityinfo_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| SchemaError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing {
        Some(SCHEMA_VERSION) => Ok(()),
        Some(found) => Err(SchemaError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO cityinfo_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| SchemaError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Migration { step, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn connection() -> Connection {
        let mut conn = Connection::open_in_memory().expect("open in-memory database");
        initialise_schema(&mut conn).expect("initialise schema");
        conn
    }

    #[rstest]
    fn rejects_unknown_versions(mut connection: Connection) {
        connection
            .execute("UPDATE cityinfo_schema_version SET version = 7", [])
            .expect("tamper with version");
        let err = initialise_schema(&mut connection).expect_err("version mismatch");
        assert!(matches!(
            err,
            SchemaError::VersionMismatch {
                expected: SCHEMA_VERSION,
                found: 7
            }
        ));
    }

    #[rstest]
    fn restricts_deleting_referenced_cities(connection: Connection) {
        connection
            .execute("INSERT INTO cities (name) VALUES ('Paris')", [])
            .expect("insert city");
        connection
            .execute(
                "INSERT INTO points_of_interest (city_id, name) VALUES (1, 'Louvre')",
                [],
            )
            .expect("insert child");
        let result = connection.execute("DELETE FROM cities WHERE id = 1", []);
        assert!(result.is_err(), "foreign key should restrict the delete");
    }

    #[rstest]
    fn rejects_blank_names(connection: Connection) {
        let result = connection.execute("INSERT INTO cities (name) VALUES ('  ')", []);
        assert!(result.is_err());
    }
}
