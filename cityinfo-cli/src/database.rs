//! Opening the catalogue database shared by every command.

use camino::{Utf8Path, Utf8PathBuf};
use cityinfo_core::{CityId, Lookup, PointOfInterestId};
use cityinfo_data::SqliteStore;

use crate::CliError;

/// Database file used when none is configured.
pub(crate) const DEFAULT_DATABASE: &str = "cityinfo.db";

pub(crate) fn database_or_default(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE))
}

pub(crate) fn open_store(path: &Utf8Path) -> Result<SqliteStore, CliError> {
    SqliteStore::open(path).map_err(|source| CliError::OpenDatabase {
        path: path.to_path_buf(),
        source,
    })
}

/// Turn a gated lookup into its value or the matching not-found error.
pub(crate) fn require_found<T>(
    lookup: Lookup<T>,
    city_id: CityId,
    id: Option<PointOfInterestId>,
) -> Result<T, CliError> {
    match lookup {
        Lookup::Found(value) => Ok(value),
        Lookup::CityNotFound => Err(CliError::NotFound {
            entity: "city",
            id: city_id.get(),
        }),
        Lookup::PointOfInterestNotFound => Err(CliError::NotFound {
            entity: "point of interest",
            id: id.map_or(0, PointOfInterestId::get),
        }),
    }
}
