//! Storage adapters for the city information service.
//!
//! Responsibilities:
//! - Persist cities and points of interest in SQLite behind the
//!   `cityinfo-core` store traits.
//! - Create and version the database schema.
//! - Provide the logging mail notifier.
//! - Open user-supplied files through `cap-std`.
//!
//! Boundaries:
//! - Do not encode domain rules (live in `cityinfo-core`).
//!
//! Invariants:
//! - One SQLite transaction per unit of work; uncommitted work is rolled back.
//! - Foreign keys are always enabled.

#![forbid(unsafe_code)]

mod fs;
mod mail;
mod sqlite;

pub use fs::open_utf8_file;
pub use mail::LogMailer;
pub use sqlite::{
    SCHEMA_VERSION, SchemaError, SqliteStore, SqliteStoreError, SqliteUnitOfWork,
    initialise_schema,
};
