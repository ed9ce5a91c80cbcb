//! `cities` and `city` commands: read-only city queries.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use cityinfo_core::{
    CityFilter, CityId, CityQueryService, CityRepresentation, CityView, DEFAULT_PAGE_SIZE,
    EntityStore, FIRST_PAGE, PageRequest, PageSize, PaginationMetadata,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::database::{database_or_default, open_store};
use crate::output::write_json;
use crate::{ARG_CITY_ID, ARG_DATABASE, CliError, ENV_CITY_CITY_ID};

/// CLI arguments for the `cities` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "cities",
    long_about = "List cities ordered by name. The name filter matches whole \
                 names and the search text matches inside names or \
                 descriptions, both ignoring ASCII case. Page sizes above 20 \
                 are reduced to 20.",
    about = "List cities with optional filtering and paging"
)]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct CitiesArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Only list cities with exactly this name.
    #[arg(long, value_name = "name")]
    #[serde(default)]
    pub(crate) name: Option<String>,
    /// Only list cities whose name or description contains this text.
    #[arg(long, value_name = "text")]
    #[serde(default)]
    pub(crate) search: Option<String>,
    /// 1-based page number (defaults to 1).
    #[arg(long, value_name = "number", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) page_number: Option<i64>,
    /// Rows per page (defaults to 10, at most 20).
    #[arg(long, value_name = "size")]
    #[serde(default)]
    pub(crate) page_size: Option<u32>,
}

/// Resolved `cities` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CitiesConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) filter: CityFilter,
    pub(crate) page: PageRequest,
}

impl From<CitiesArgs> for CitiesConfig {
    fn from(args: CitiesArgs) -> Self {
        let page_size = PageSize::clamped(args.page_size.unwrap_or(DEFAULT_PAGE_SIZE));
        Self {
            database: database_or_default(args.database),
            filter: CityFilter::new(args.name.as_deref(), args.search.as_deref()),
            page: PageRequest::new(args.page_number.unwrap_or(FIRST_PAGE), page_size),
        }
    }
}

#[derive(Debug, Serialize)]
struct CityListing {
    pagination: PaginationMetadata,
    cities: Vec<CityView>,
}

pub(crate) fn run_cities_with(args: CitiesArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = CitiesConfig::from(merged);
    let mut store = open_store(&config.database)?;
    let unit = store.begin()?;
    let page = CityQueryService::new(&unit).list_filtered(&config.filter, config.page)?;
    let listing = CityListing {
        pagination: page.metadata,
        cities: page.items.iter().map(CityView::from).collect(),
    };
    write_json(writer, &listing)
}

/// CLI arguments for the `city` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "city", about = "Show one city")]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct CityArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Identifier of the city.
    #[arg(long = ARG_CITY_ID, value_name = "id")]
    #[serde(default)]
    pub(crate) city_id: Option<i64>,
    /// Also load the city's points of interest.
    #[arg(long)]
    #[serde(default)]
    pub(crate) include_points_of_interest: bool,
}

/// Resolved `city` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CityConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) city_id: CityId,
    pub(crate) include_points_of_interest: bool,
}

impl TryFrom<CityArgs> for CityConfig {
    type Error = CliError;

    fn try_from(args: CityArgs) -> Result<Self, Self::Error> {
        let city_id = args.city_id.ok_or(CliError::MissingArgument {
            field: ARG_CITY_ID,
            env: ENV_CITY_CITY_ID,
        })?;
        Ok(Self {
            database: database_or_default(args.database),
            city_id: CityId::new(city_id),
            include_points_of_interest: args.include_points_of_interest,
        })
    }
}

pub(crate) fn run_city_with(args: CityArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = CityConfig::try_from(merged)?;
    let mut store = open_store(&config.database)?;
    let unit = store.begin()?;
    let city = CityQueryService::new(&unit)
        .get(config.city_id, config.include_points_of_interest)?
        .ok_or(CliError::NotFound {
            entity: "city",
            id: config.city_id.get(),
        })?;
    write_json(writer, &CityRepresentation::from(&city))
}

#[cfg(test)]
pub(crate) fn cities_config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<CitiesConfig, CliError> {
    let merged = CitiesArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(CitiesConfig::from(merged))
}
