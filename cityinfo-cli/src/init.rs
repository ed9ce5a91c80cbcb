//! `init` command: create the schema and seed an empty catalogue.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use cityinfo_core::seed::seed_catalogue;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::database::{database_or_default, open_store};
use crate::output::write_json;
use crate::{ARG_DATABASE, CliError};

/// CLI arguments for the `init` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "init",
    about = "Create the database schema and seed an empty catalogue"
)]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct InitArgs {
    /// Path to the SQLite database (defaults to `cityinfo.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct InitReport {
    database: Utf8PathBuf,
    seeded: bool,
}

pub(crate) fn run_init_with(args: InitArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let database = database_or_default(merged.database);
    let mut store = open_store(&database)?;
    let seeded = seed_catalogue(&mut store)?;
    info!("initialised {database} (seeded: {seeded})");
    write_json(writer, &InitReport { database, seeded })
}
