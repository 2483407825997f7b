//! Parsers for NCBI taxonomy dump and accession2taxid files
//!
//! All readers are lazy cursors: they pull one record per iteration so
//! multi-gigabyte inputs never have to fit in memory. Only the merge
//! step materializes its output, and it holds taxa, not accessions.

pub mod accession;
pub mod merge;
pub mod reader;

pub use accession::AccessionRecords;
pub use merge::merge_taxa;
pub use reader::{NameRecord, NameRecords, NodeRecord, NodeRecords};
