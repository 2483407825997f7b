//! Remote fetch, integrity verification, and archive extraction

pub mod ncbi;

pub use ncbi::{extract_tar_gz, verify_md5, NCBIDownloader};
