//! Error types emitted by the cityinfo CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use cityinfo_core::{PartialUpdateError, PatchError, RepositoryError, ValidationErrors};
use cityinfo_data::SqliteStoreError;
use thiserror::Error;

/// Errors emitted by the cityinfo CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The requested operation requires a missing compile-time feature.
    #[error("{action} requires the `{feature}` feature to be enabled")]
    MissingFeature {
        /// Cargo feature name.
        feature: &'static str,
        /// Command that needed it.
        action: &'static str,
    },
    /// Opening the catalogue database failed.
    #[error("failed to open city database at {path:?}: {source}")]
    OpenDatabase {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying store error.
        #[source]
        source: SqliteStoreError,
    },
    /// A store operation failed after the database was opened.
    #[error("store operation failed: {0}")]
    Store(#[from] SqliteStoreError),
    /// The addressed city or point of interest does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Kind of resource.
        entity: &'static str,
        /// Identifier that was looked up.
        id: i64,
    },
    /// The resulting point of interest is invalid.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    /// The patch document could not be applied.
    #[error("patch rejected: {0}")]
    Patch(#[from] PatchError),
    /// The store reported that the change was not saved.
    #[error("the change was not persisted")]
    NotPersisted,
    /// Opening the patch document failed.
    #[error("failed to open patch document at {path:?}: {source}")]
    OpenPatchDocument {
        /// Document path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The patch document is not valid JSON Patch.
    #[error("failed to parse patch document at {path:?}: {source}")]
    ParsePatchDocument {
        /// Document path.
        path: Utf8PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Token issuance, validation or authorisation failed.
    #[cfg(feature = "auth")]
    #[error(transparent)]
    Auth(#[from] cityinfo_auth::AuthError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}

impl From<RepositoryError<SqliteStoreError>> for CliError {
    fn from(err: RepositoryError<SqliteStoreError>) -> Self {
        match err {
            RepositoryError::Store(source) => Self::Store(source),
            RepositoryError::Validation(errors) => Self::Validation(errors),
        }
    }
}

impl From<PartialUpdateError<SqliteStoreError>> for CliError {
    fn from(err: PartialUpdateError<SqliteStoreError>) -> Self {
        match err {
            PartialUpdateError::Patch(source) => Self::Patch(source),
            PartialUpdateError::Validation(errors) => Self::Validation(errors),
            PartialUpdateError::NotPersisted => Self::NotPersisted,
            PartialUpdateError::Store(source) => Self::Store(source),
        }
    }
}
