//! Table definitions for the taxonomy store
//!
//! `accessions.taxon_id` is a real foreign key and connections run with
//! `foreign_keys = ON`, so a dangling accession is rejected at insert
//! time. `parent_taxon_id` carries no such constraint: the NCBI root
//! node references itself and lineage walks tolerate gaps.

pub const SCHEMA_SQL: &str = "
CREATE TABLE taxa (
    taxon_id        INTEGER PRIMARY KEY,
    parent_taxon_id INTEGER NOT NULL,
    scientific_name TEXT NOT NULL,
    rank            TEXT NOT NULL
);

CREATE TABLE accessions (
    accession_number TEXT NOT NULL,
    taxon_id         INTEGER NOT NULL REFERENCES taxa(taxon_id)
);

CREATE INDEX idx_accessions_accession_number ON accessions(accession_number);
CREATE INDEX idx_accessions_taxon_id ON accessions(taxon_id);
";
