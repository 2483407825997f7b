//! Shared test fixtures for the taxadb workspace

pub mod fixtures;
