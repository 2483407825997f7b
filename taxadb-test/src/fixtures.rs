//! Miniature NCBI-format files for tests
//!
//! The sample lineage uses real taxon ids (root, Bacteria, the E. coli
//! lineage, Homo sapiens) so fixtures read like a genuine dump.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

/// (taxon_id, parent_taxon_id, rank) rows for nodes.dmp
pub const SAMPLE_NODES: &[(u32, u32, &str)] = &[
    (1, 1, "no rank"),
    (2, 1, "superkingdom"),
    (543, 2, "family"),
    (561, 543, "genus"),
    (562, 561, "species"),
    (9606, 1, "species"),
];

/// (taxon_id, scientific_name) rows for the "scientific name" class of
/// names.dmp, matching [`SAMPLE_NODES`]
pub const SAMPLE_NAMES: &[(u32, &str)] = &[
    (1, "root"),
    (2, "Bacteria"),
    (543, "Enterobacteriaceae"),
    (561, "Escherichia"),
    (562, "Escherichia coli"),
    (9606, "Homo sapiens"),
];

/// (accession, accession.version, taxid, gi) rows for accession2taxid
/// files; every taxid appears in [`SAMPLE_NODES`]
pub const SAMPLE_ACCESSIONS: &[(&str, &str, u32, u64)] = &[
    ("AB000001", "AB000001.1", 562, 1234561),
    ("AB000002", "AB000002.1", 562, 1234562),
    ("AC000003", "AC000003.2", 561, 1234563),
    ("AC000004", "AC000004.1", 9606, 1234564),
];

/// Header line shared by all accession2taxid files
pub const ACCESSION_HEADER: &str = "accession\taccession.version\ttaxid\tgi";

/// Format one nodes.dmp row. Real rows carry more fields; readers only
/// consume the first three, so one trailing filler field is enough.
pub fn nodes_dmp_line(taxon_id: u32, parent_taxon_id: u32, rank: &str) -> String {
    format!("{}\t|\t{}\t|\t{}\t|\t\t|\n", taxon_id, parent_taxon_id, rank)
}

/// Format one names.dmp row with the given name class
pub fn names_dmp_line(taxon_id: u32, name: &str, class: &str) -> String {
    format!("{}\t|\t{}\t|\t\t|\t{}\t|\n", taxon_id, name, class)
}

/// Write a nodes.dmp built from the given rows into `dir`
pub fn write_nodes_file(dir: &Path, rows: &[(u32, u32, &str)]) -> std::io::Result<PathBuf> {
    let path = dir.join("nodes.dmp");
    let mut content = String::new();
    for (taxon_id, parent_taxon_id, rank) in rows {
        content.push_str(&nodes_dmp_line(*taxon_id, *parent_taxon_id, rank));
    }
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Write a names.dmp into `dir` with one synonym and one scientific-name
/// line per row, so readers have to filter by class
pub fn write_names_file(dir: &Path, rows: &[(u32, &str)]) -> std::io::Result<PathBuf> {
    let path = dir.join("names.dmp");
    let mut content = String::new();
    for (taxon_id, name) in rows {
        content.push_str(&names_dmp_line(
            *taxon_id,
            &format!("{} alias", name),
            "synonym",
        ));
        content.push_str(&names_dmp_line(*taxon_id, name, "scientific name"));
    }
    std::fs::write(&path, content)?;
    Ok(path)
}

/// Write an accession2taxid file into `dir`, gzip-compressed when
/// `file_name` ends in `.gz`, always starting with the column header
pub fn write_accession_file(
    dir: &Path,
    file_name: &str,
    rows: &[(&str, &str, u32, u64)],
) -> std::io::Result<PathBuf> {
    let path = dir.join(file_name);
    let mut content = String::from(ACCESSION_HEADER);
    content.push('\n');
    for (accession, version, taxid, gi) in rows {
        content.push_str(&format!("{}\t{}\t{}\t{}\n", accession, version, taxid, gi));
    }

    if file_name.ends_with(".gz") {
        let file = File::create(&path)?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder.write_all(content.as_bytes())?;
        encoder.finish()?;
    } else {
        std::fs::write(&path, content)?;
    }
    Ok(path)
}

/// Path of the digest file NCBI publishes next to each download
pub fn md5_companion_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".md5");
    PathBuf::from(name)
}

/// Write a matching `.md5` companion for an existing file
pub fn write_md5_companion(path: &Path) -> std::io::Result<PathBuf> {
    let digest = md5::compute(std::fs::read(path)?);
    write_md5_companion_with(path, &format!("{:x}", digest))
}

/// Write a `.md5` companion carrying an arbitrary digest, for tests
/// that need a corrupt one
pub fn write_md5_companion_with(path: &Path, digest: &str) -> std::io::Result<PathBuf> {
    let companion = md5_companion_path(path);
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    std::fs::write(&companion, format!("{}  {}\n", digest, file_name))?;
    Ok(companion)
}
