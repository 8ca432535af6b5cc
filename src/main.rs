//! Command-line front end for projstash.
//!
//! A thin caller of the storage layer: it builds a [`StorageModule`] over
//! file-backed media from configuration, runs one operation, and prints the
//! result as JSON.
//!
//! ```text
//! projstash save sketch --data '{"shapes":[]}' --rev a1b2@1700000000000
//! projstash fetch sketch
//! projstash list --unique
//! projstash backends
//! ```
//!
//! Configuration comes from `--config FILE` (TOML) when given, otherwise from
//! defaults (see [`projstash::Config`]).

#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use projstash::storage::dedup_by_id;
use projstash::{Config, Project, StorageModule, Version};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "projstash", version, about = "Save, fetch and list projects across storage backends")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Save a project to every configured backend
    Save {
        /// Project id
        id: String,

        /// Opaque project payload
        #[arg(long, default_value = "")]
        data: String,

        /// Version as HASH or HASH@TIMESTAMP; repeat for several
        #[arg(long = "rev", value_name = "HASH[@TIMESTAMP]", value_parser = parse_version)]
        versions: Vec<Version>,
    },
    /// Print the first copy of a project found across backends
    Fetch {
        /// Project id
        id: String,
    },
    /// Print every project from every backend
    List {
        /// Keep only the first copy of each id
        #[arg(long)]
        unique: bool,
    },
    /// Print the configured backends in fallback order
    Backends,
}

/// Parses `HASH` or `HASH@TIMESTAMP`; a bare hash is stamped with the current time.
fn parse_version(raw: &str) -> Result<Version, String> {
    match raw.rsplit_once('@') {
        Some((hash, timestamp)) if !hash.is_empty() => timestamp
            .parse::<i64>()
            .map(|ts| Version::new(hash, ts))
            .map_err(|e| format!("invalid timestamp '{timestamp}': {e}")),
        Some(_) => Err("version hash must not be empty".to_string()),
        None if raw.is_empty() => Err("version hash must not be empty".to_string()),
        None => Ok(Version::now(raw)),
    }
}

fn load_config(cli: &Cli) -> projstash::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }
    Ok(config)
}

/// Prints `value` as pretty JSON; returns `false` if it could not be formatted.
fn print_json<T: serde::Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            eprintln!("Error: cannot format output: {e}");
            false
        }
    }
}

/// Runs one command, returning whether it succeeded.
fn run(command: Commands, storage: &mut StorageModule) -> bool {
    match command {
        Commands::Save { id, data, versions } => {
            let project = Project { id, data, versions };
            if let Err(e) = project.validate() {
                eprintln!("Error: {e}");
                return false;
            }
            storage.save_project(&project);
            tracing::info!(project_id = %project.id, "project saved");
            print_json(&project)
        }
        Commands::Fetch { id } => match storage.fetch_project(&id) {
            Some(project) => print_json(&project),
            None => {
                eprintln!("No project with id '{id}'");
                false
            }
        },
        Commands::List { unique } => {
            let projects = storage.list_projects();
            let projects = if unique { dedup_by_id(projects) } else { projects };
            print_json(&projects)
        }
        Commands::Backends => print_json(&storage.backend_names()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    projstash::observability::init_tracing(&config);
    let _span = tracing::info_span!("cli", data_dir = ?config.data_dir).entered();

    let mut storage = match projstash::initialize(&config) {
        Ok(storage) => storage,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize storage");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if run(cli.command, &mut storage) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
