#![allow(dead_code)]

use assert_cmd::Command;
use std::path::Path;

use taxadb_test::fixtures;

/// Helper to run the taxadb CLI
pub fn taxadb_cmd() -> Command {
    Command::cargo_bin("taxadb").unwrap()
}

/// Populate `dir` with the standard fixture dumps and one accession file
pub fn seed_input_dir(dir: &Path) -> std::io::Result<()> {
    fixtures::write_nodes_file(dir, fixtures::SAMPLE_NODES)?;
    fixtures::write_names_file(dir, fixtures::SAMPLE_NAMES)?;
    fixtures::write_accession_file(
        dir,
        "nucl_gb.accession2taxid.gz",
        fixtures::SAMPLE_ACCESSIONS,
    )?;
    Ok(())
}
