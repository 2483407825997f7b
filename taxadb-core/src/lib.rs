//! Core types, errors, and configuration shared across all taxadb crates

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{default_config, load_config, resolve_config, save_config, Config};
pub use error::{TaxadbError, TaxadbResult};
pub use types::{Accession, NCBIDataset, Taxon};

/// Version information for the taxadb project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
