//! Points-of-interest commands: `pois`, `poi`, `create-poi`, `update-poi`,
//! `patch-poi` and `delete-poi`.

use std::io::{BufReader, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use cityinfo_core::{
    CityId, EntityStore, NotificationError, NotificationSink, PatchDocument, PointOfInterestDraft,
    PointOfInterestId, PointOfInterestView, PointsOfInterestRepository, apply_partial_update,
};
use cityinfo_data::{LogMailer, open_utf8_file};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::database::{database_or_default, open_store, require_found};
use crate::output::write_json;
use crate::{
    ARG_CITY_ID, ARG_DATABASE, ARG_DESCRIPTION, ARG_MAIL_FROM, ARG_MAIL_TO, ARG_NAME,
    ARG_PATCH_DOCUMENT, ARG_POI_ID, CliError, ENV_CREATE_CITY_ID, ENV_DELETE_CITY_ID,
    ENV_DELETE_POI_ID, ENV_MAIL_FROM, ENV_MAIL_TO, ENV_PATCH_CITY_ID, ENV_PATCH_DOCUMENT,
    ENV_PATCH_POI_ID, ENV_POI_CITY_ID, ENV_POI_POI_ID, ENV_POIS_CITY_ID, ENV_UPDATE_CITY_ID,
    ENV_UPDATE_POI_ID,
};

/// Sink for commands that never queue notifications.
struct Discard;

impl NotificationSink for Discard {
    fn notify(&self, _subject: &str, _body: &str) -> Result<(), NotificationError> {
        Ok(())
    }
}

fn required<T>(value: Option<T>, field: &'static str, env: &'static str) -> Result<T, CliError> {
    value.ok_or(CliError::MissingArgument { field, env })
}

/// CLI arguments for the `pois` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "pois", about = "List the points of interest of a city")]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct PoisArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the owning city.
    #[arg(long = ARG_CITY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) city_id: Option<i64>,
}

pub(crate) fn run_pois_with(args: PoisArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let city_id = CityId::new(required(merged.city_id, ARG_CITY_ID, ENV_POIS_CITY_ID)?);
    let mut store = open_store(&database_or_default(merged.database))?;
    let repository = PointsOfInterestRepository::new(store.begin()?, Discard);
    let points = require_found(repository.list_for_city(city_id)?, city_id, None)?;
    let views: Vec<_> = points.iter().map(PointOfInterestView::from).collect();
    write_json(writer, &views)
}

/// CLI arguments for the `poi` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "poi", about = "Show one point of interest of a city")]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct PoiArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the owning city.
    #[arg(long = ARG_CITY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) city_id: Option<i64>,
    /// Identifier of the point of interest.
    #[arg(long = ARG_POI_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) poi_id: Option<i64>,
}

/// Resolved `poi` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PoiConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) city_id: CityId,
    pub(crate) poi_id: PointOfInterestId,
}

impl TryFrom<PoiArgs> for PoiConfig {
    type Error = CliError;

    fn try_from(args: PoiArgs) -> Result<Self, Self::Error> {
        let city_id = required(args.city_id, ARG_CITY_ID, ENV_POI_CITY_ID)?;
        let poi_id = required(args.poi_id, ARG_POI_ID, ENV_POI_POI_ID)?;
        Ok(Self {
            database: database_or_default(args.database),
            city_id: CityId::new(city_id),
            poi_id: PointOfInterestId::new(poi_id),
        })
    }
}

pub(crate) fn run_poi_with(args: PoiArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = PoiConfig::try_from(merged)?;
    let mut store = open_store(&config.database)?;
    let repository = PointsOfInterestRepository::new(store.begin()?, Discard);
    let lookup = repository.get(config.city_id, config.poi_id)?;
    let poi = require_found(lookup, config.city_id, Some(config.poi_id))?;
    write_json(writer, &PointOfInterestView::from(&poi))
}

/// CLI arguments for the `create-poi` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "create-poi",
    long_about = "Add a point of interest to a city. The name is required \
                 and limited to 50 characters; the description is limited \
                 to 200 characters. The identifier is assigned by the store.",
    about = "Add a point of interest to a city"
)]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct CreatePoiArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the owning city.
    #[arg(long = ARG_CITY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) city_id: Option<i64>,
    /// Display name.
    #[arg(long = ARG_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Optional description.
    #[arg(long = ARG_DESCRIPTION, value_name = "text")]
    #[serde(default)]
    pub(crate) description: Option<String>,
}

/// Resolved `create-poi` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CreatePoiConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) city_id: CityId,
    pub(crate) draft: PointOfInterestDraft,
}

impl TryFrom<CreatePoiArgs> for CreatePoiConfig {
    type Error = CliError;

    fn try_from(args: CreatePoiArgs) -> Result<Self, Self::Error> {
        let city_id = required(args.city_id, ARG_CITY_ID, ENV_CREATE_CITY_ID)?;
        // A missing name is a validation failure, reported with the other
        // field constraints once the city is known to exist.
        Ok(Self {
            database: database_or_default(args.database),
            city_id: CityId::new(city_id),
            draft: PointOfInterestDraft::new(args.name.unwrap_or_default(), args.description),
        })
    }
}

pub(crate) fn run_create_poi_with(
    args: CreatePoiArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = CreatePoiConfig::try_from(merged)?;
    let mut store = open_store(&config.database)?;
    let mut repository = PointsOfInterestRepository::new(store.begin()?, Discard);
    let lookup = repository.create(config.city_id, config.draft)?;
    let created = require_found(lookup, config.city_id, None)?;
    if !repository.save_changes()? {
        return Err(CliError::NotPersisted);
    }
    info!(
        "created point of interest {} in city {}",
        created.id, config.city_id
    );
    write_json(writer, &PointOfInterestView::from(&created))
}

/// CLI arguments for the `update-poi` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "update-poi",
    long_about = "Replace every field of a point of interest. A description \
                 that is not supplied is cleared.",
    about = "Replace a point of interest"
)]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct UpdatePoiArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the owning city.
    #[arg(long = ARG_CITY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) city_id: Option<i64>,
    /// Identifier of the point of interest.
    #[arg(long = ARG_POI_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) poi_id: Option<i64>,
    /// Replacement name.
    #[arg(long = ARG_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Replacement description.
    #[arg(long = ARG_DESCRIPTION, value_name = "text")]
    #[serde(default)]
    pub(crate) description: Option<String>,
}

/// Resolved `update-poi` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UpdatePoiConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) city_id: CityId,
    pub(crate) poi_id: PointOfInterestId,
    pub(crate) draft: PointOfInterestDraft,
}

impl TryFrom<UpdatePoiArgs> for UpdatePoiConfig {
    type Error = CliError;

    fn try_from(args: UpdatePoiArgs) -> Result<Self, Self::Error> {
        let city_id = required(args.city_id, ARG_CITY_ID, ENV_UPDATE_CITY_ID)?;
        let poi_id = required(args.poi_id, ARG_POI_ID, ENV_UPDATE_POI_ID)?;
        Ok(Self {
            database: database_or_default(args.database),
            city_id: CityId::new(city_id),
            poi_id: PointOfInterestId::new(poi_id),
            draft: PointOfInterestDraft::new(args.name.unwrap_or_default(), args.description),
        })
    }
}

pub(crate) fn run_update_poi_with(
    args: UpdatePoiArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = UpdatePoiConfig::try_from(merged)?;
    let mut store = open_store(&config.database)?;
    let mut repository = PointsOfInterestRepository::new(store.begin()?, Discard);
    let lookup = repository.update(config.city_id, config.poi_id, config.draft)?;
    let updated = require_found(lookup, config.city_id, Some(config.poi_id))?;
    if !repository.save_changes()? {
        return Err(CliError::NotPersisted);
    }
    info!("replaced point of interest {}", updated.id);
    write_json(writer, &PointOfInterestView::from(&updated))
}

/// CLI arguments for the `patch-poi` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "patch-poi",
    long_about = "Apply a JSON Patch document to a point of interest. Only \
                 /name and /description can be addressed. The change is saved \
                 only if every operation applies and the result is valid.",
    about = "Apply a JSON Patch document to a point of interest"
)]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct PatchPoiArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the owning city.
    #[arg(long = ARG_CITY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) city_id: Option<i64>,
    /// Identifier of the point of interest.
    #[arg(long = ARG_POI_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) poi_id: Option<i64>,
    /// Path to a JSON file holding the patch operations.
    #[arg(long = ARG_PATCH_DOCUMENT, value_name = "path")]
    #[serde(default)]
    pub(crate) document: Option<Utf8PathBuf>,
}

/// Resolved `patch-poi` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PatchPoiConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) city_id: CityId,
    pub(crate) poi_id: PointOfInterestId,
    pub(crate) document: Utf8PathBuf,
}

impl TryFrom<PatchPoiArgs> for PatchPoiConfig {
    type Error = CliError;

    fn try_from(args: PatchPoiArgs) -> Result<Self, Self::Error> {
        let city_id = required(args.city_id, ARG_CITY_ID, ENV_PATCH_CITY_ID)?;
        let poi_id = required(args.poi_id, ARG_POI_ID, ENV_PATCH_POI_ID)?;
        let document = required(args.document, ARG_PATCH_DOCUMENT, ENV_PATCH_DOCUMENT)?;
        Ok(Self {
            database: database_or_default(args.database),
            city_id: CityId::new(city_id),
            poi_id: PointOfInterestId::new(poi_id),
            document,
        })
    }
}

/// Loads a JSON-encoded [`PatchDocument`] from disk.
pub(crate) fn load_patch_document(path: &Utf8Path) -> Result<PatchDocument, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenPatchDocument {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        CliError::ParsePatchDocument {
            path: path.to_path_buf(),
            source,
        }
    })
}

pub(crate) fn run_patch_poi_with(
    args: PatchPoiArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = PatchPoiConfig::try_from(merged)?;
    let document = load_patch_document(&config.document)?;
    let mut store = open_store(&config.database)?;
    let repository = PointsOfInterestRepository::new(store.begin()?, Discard);
    let lookup = apply_partial_update(repository, config.city_id, config.poi_id, &document)?;
    let updated = require_found(lookup, config.city_id, Some(config.poi_id))?;
    write_json(writer, &PointOfInterestView::from(&updated))
}

/// CLI arguments for the `delete-poi` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "delete-poi",
    about = "Delete a point of interest and send the deletion mail"
)]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct DeletePoiArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the owning city.
    #[arg(long = ARG_CITY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) city_id: Option<i64>,
    /// Identifier of the point of interest.
    #[arg(long = ARG_POI_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) poi_id: Option<i64>,
    /// Sender address for the deletion mail.
    #[arg(long = ARG_MAIL_FROM, value_name = "address")]
    #[serde(default)]
    pub(crate) mail_from: Option<String>,
    /// Recipient address for the deletion mail.
    #[arg(long = ARG_MAIL_TO, value_name = "address")]
    #[serde(default)]
    pub(crate) mail_to: Option<String>,
}

/// Resolved `delete-poi` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DeletePoiConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) city_id: CityId,
    pub(crate) poi_id: PointOfInterestId,
    pub(crate) mail_from: String,
    pub(crate) mail_to: String,
}

impl TryFrom<DeletePoiArgs> for DeletePoiConfig {
    type Error = CliError;

    fn try_from(args: DeletePoiArgs) -> Result<Self, Self::Error> {
        let city_id = required(args.city_id, ARG_CITY_ID, ENV_DELETE_CITY_ID)?;
        let poi_id = required(args.poi_id, ARG_POI_ID, ENV_DELETE_POI_ID)?;
        let mail_from = required(args.mail_from, ARG_MAIL_FROM, ENV_MAIL_FROM)?;
        let mail_to = required(args.mail_to, ARG_MAIL_TO, ENV_MAIL_TO)?;
        Ok(Self {
            database: database_or_default(args.database),
            city_id: CityId::new(city_id),
            poi_id: PointOfInterestId::new(poi_id),
            mail_from,
            mail_to,
        })
    }
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: PointOfInterestView,
}

pub(crate) fn run_delete_poi_with(
    args: DeletePoiArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = DeletePoiConfig::try_from(merged)?;
    let mailer = LogMailer::new(config.mail_from, config.mail_to);
    let mut store = open_store(&config.database)?;
    let mut repository = PointsOfInterestRepository::new(store.begin()?, mailer);
    let lookup = repository.delete(config.city_id, config.poi_id)?;
    let removed = require_found(lookup, config.city_id, Some(config.poi_id))?;
    if !repository.save_changes()? {
        return Err(CliError::NotPersisted);
    }
    info!(
        "deleted point of interest {} of city {}",
        removed.id, config.city_id
    );
    write_json(
        writer,
        &Deleted {
            deleted: PointOfInterestView::from(&removed),
        },
    )
}
