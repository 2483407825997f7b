use anyhow::Context;
use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;
mod download;

use crate::cli::{Cli, Commands};
use taxadb_core::{resolve_config, TaxadbError};

fn main() {
    // Initialize logging with TAXADB_LOG environment variable support
    let log_level = std::env::var("TAXADB_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Exit codes are part of the interface, one per failure kind
        let exit_code = match e.downcast_ref::<TaxadbError>() {
            Some(TaxadbError::Configuration(_)) => 2,
            Some(TaxadbError::Io(_)) => 3,
            Some(TaxadbError::Parse(_)) => 4,
            Some(TaxadbError::Database(_)) => 5,
            Some(TaxadbError::Checksum(_)) => 6,
            Some(TaxadbError::Network(_)) => 7,
            Some(TaxadbError::MissingTaxon(_)) => 8,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config =
        resolve_config(cli.config.as_deref()).context("failed to load configuration")?;

    if cli.verbose > 0 {
        eprintln!("Using {} as the NCBI base URL", config.download.base_url);
    }

    match cli.command {
        Commands::Download(args) => crate::cli::commands::download::run(args, &config),
        Commands::Create(args) => crate::cli::commands::create::run(args, &config),
    }
}
