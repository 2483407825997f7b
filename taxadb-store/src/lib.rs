//! SQLite-backed storage for taxonomy snapshots

pub mod schema;
pub mod sqlite;

pub use sqlite::TaxonomyStore;
