//! Core error types for taxadb

use thiserror::Error;

/// Main error type for taxadb operations
#[derive(Error, Debug)]
pub enum TaxadbError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Checksum mismatch: {0}")]
    Checksum(String),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Missing taxon: {0}")]
    MissingTaxon(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

/// Result type alias for taxadb operations
pub type TaxadbResult<T> = Result<T, TaxadbError>;
