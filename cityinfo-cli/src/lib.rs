//! Command-line interface for the city information catalogue.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod cities;
mod database;
mod error;
mod init;
pub mod logging;
mod output;
mod points;
mod token;

pub use error::CliError;

use cities::{CitiesArgs, CityArgs};
use init::InitArgs;
use points::{CreatePoiArgs, DeletePoiArgs, PatchPoiArgs, PoiArgs, PoisArgs, UpdatePoiArgs};
use token::{TokenArgs, VerifyTokenArgs};

const ARG_DATABASE: &str = "database";
const ARG_CITY_ID: &str = "city-id";
const ARG_POI_ID: &str = "poi-id";
const ARG_NAME: &str = "name";
const ARG_DESCRIPTION: &str = "description";
const ARG_PATCH_DOCUMENT: &str = "document";
const ARG_MAIL_FROM: &str = "mail-from";
const ARG_MAIL_TO: &str = "mail-to";
const ARG_SECRET: &str = "secret";
const ARG_USER_NAME: &str = "user-name";
const ARG_TOKEN: &str = "token";

const ENV_CITY_CITY_ID: &str = "CITYINFO_CMDS_CITY_CITY_ID";
const ENV_POIS_CITY_ID: &str = "CITYINFO_CMDS_POIS_CITY_ID";
const ENV_POI_CITY_ID: &str = "CITYINFO_CMDS_POI_CITY_ID";
const ENV_POI_POI_ID: &str = "CITYINFO_CMDS_POI_POI_ID";
const ENV_CREATE_CITY_ID: &str = "CITYINFO_CMDS_CREATE_POI_CITY_ID";
const ENV_UPDATE_CITY_ID: &str = "CITYINFO_CMDS_UPDATE_POI_CITY_ID";
const ENV_UPDATE_POI_ID: &str = "CITYINFO_CMDS_UPDATE_POI_POI_ID";
const ENV_PATCH_CITY_ID: &str = "CITYINFO_CMDS_PATCH_POI_CITY_ID";
const ENV_PATCH_POI_ID: &str = "CITYINFO_CMDS_PATCH_POI_POI_ID";
const ENV_PATCH_DOCUMENT: &str = "CITYINFO_CMDS_PATCH_POI_DOCUMENT";
const ENV_DELETE_CITY_ID: &str = "CITYINFO_CMDS_DELETE_POI_CITY_ID";
const ENV_DELETE_POI_ID: &str = "CITYINFO_CMDS_DELETE_POI_POI_ID";
const ENV_MAIL_FROM: &str = "CITYINFO_CMDS_DELETE_POI_MAIL_FROM";
const ENV_MAIL_TO: &str = "CITYINFO_CMDS_DELETE_POI_MAIL_TO";
#[cfg(feature = "auth")]
const ENV_TOKEN_SECRET: &str = "CITYINFO_CMDS_TOKEN_SECRET";
#[cfg(feature = "auth")]
const ENV_TOKEN_USER_NAME: &str = "CITYINFO_CMDS_TOKEN_USER_NAME";
#[cfg(feature = "auth")]
const ENV_VERIFY_SECRET: &str = "CITYINFO_CMDS_VERIFY_TOKEN_SECRET";
#[cfg(feature = "auth")]
const ENV_VERIFY_TOKEN: &str = "CITYINFO_CMDS_VERIFY_TOKEN_TOKEN";

/// Run the CLI with the current process arguments, writing results to
/// standard output.
///
/// # Errors
/// Returns [`CliError`] when parsing, configuration or the command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli.command, &mut stdout)
}

fn run_with(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Init(args) => init::run_init_with(args, writer),
        Command::Cities(args) => cities::run_cities_with(args, writer),
        Command::City(args) => cities::run_city_with(args, writer),
        Command::Pois(args) => points::run_pois_with(args, writer),
        Command::Poi(args) => points::run_poi_with(args, writer),
        Command::CreatePoi(args) => points::run_create_poi_with(args, writer),
        Command::UpdatePoi(args) => points::run_update_poi_with(args, writer),
        Command::PatchPoi(args) => points::run_patch_poi_with(args, writer),
        Command::DeletePoi(args) => points::run_delete_poi_with(args, writer),
        Command::Token(args) => token::run_token_with(args, writer),
        Command::VerifyToken(args) => token::run_verify_token_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "cityinfo",
    about = "Browse and edit the city and points-of-interest catalogue",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the database schema and seed an empty catalogue.
    Init(InitArgs),
    /// List cities with optional filtering and paging.
    Cities(CitiesArgs),
    /// Show one city.
    City(CityArgs),
    /// List the points of interest of a city.
    Pois(PoisArgs),
    /// Show one point of interest.
    Poi(PoiArgs),
    /// Add a point of interest to a city.
    CreatePoi(CreatePoiArgs),
    /// Replace every field of a point of interest.
    UpdatePoi(UpdatePoiArgs),
    /// Apply a JSON Patch document to a point of interest.
    PatchPoi(PatchPoiArgs),
    /// Delete a point of interest and send the deletion mail.
    DeletePoi(DeletePoiArgs),
    /// Issue a bearer token.
    Token(TokenArgs),
    /// Validate a bearer token and report its claims.
    VerifyToken(VerifyTokenArgs),
}

#[cfg(test)]
mod tests;
