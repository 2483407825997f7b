pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "taxadb",
    version,
    about = "Build local NCBI taxonomy snapshots for offline lookup",
    long_about = "taxadb downloads the NCBI taxonomy dump and accession2taxid \
                  mapping files, verifies them against their published md5 \
                  digests, and bulk-loads them into a local SQLite database \
                  holding two related tables: taxa and accessions."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: $TAXADB_HOME/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the files required to build the database
    Download(commands::download::DownloadArgs),

    /// Build the database from already-downloaded files
    Create(commands::create::CreateArgs),
}
