//! Line cursors over the nodes.dmp and names.dmp flat files
//!
//! Dump rows are pipe-delimited with tab padding around every field,
//! e.g. `562\t|\t561\t|\tspecies\t|`. Rows carry more fields than the
//! snapshot needs; everything past the consumed columns is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use taxadb_core::{TaxadbError, TaxadbResult};
use tracing::debug;

/// One line of nodes.dmp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRecord {
    pub taxon_id: u32,
    pub parent_taxon_id: u32,
    pub rank: String,
}

/// One retained line of names.dmp (name class "scientific name")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRecord {
    pub taxon_id: u32,
    pub scientific_name: String,
}

fn split_dump_line(line: &str) -> Vec<&str> {
    line.split('|').map(|field| field.trim_matches('\t')).collect()
}

fn parse_taxon_id(field: &str, path: &Path, line_no: usize) -> TaxadbResult<u32> {
    field.parse().map_err(|_| {
        TaxadbError::Parse(format!(
            "{}:{}: invalid taxon id '{}'",
            path.display(),
            line_no,
            field
        ))
    })
}

/// Lazy cursor over nodes.dmp
pub struct NodeRecords {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    line_no: usize,
}

impl NodeRecords {
    pub fn open<P: AsRef<Path>>(path: P) -> TaxadbResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("reading node records from {}", path.display());
        let file = File::open(&path)?;
        Ok(NodeRecords {
            lines: BufReader::new(file).lines(),
            path,
            line_no: 0,
        })
    }

    fn parse_line(&self, line: &str) -> TaxadbResult<NodeRecord> {
        let fields = split_dump_line(line);
        if fields.len() < 3 {
            return Err(TaxadbError::Parse(format!(
                "{}:{}: expected at least 3 fields, got {}",
                self.path.display(),
                self.line_no,
                fields.len()
            )));
        }
        Ok(NodeRecord {
            taxon_id: parse_taxon_id(fields[0], &self.path, self.line_no)?,
            parent_taxon_id: parse_taxon_id(fields[1], &self.path, self.line_no)?,
            rank: fields[2].to_string(),
        })
    }
}

impl Iterator for NodeRecords {
    type Item = TaxadbResult<NodeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };
        self.line_no += 1;
        Some(self.parse_line(&line))
    }
}

/// Lazy cursor over names.dmp, yielding only "scientific name" lines
pub struct NameRecords {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    line_no: usize,
}

impl NameRecords {
    pub fn open<P: AsRef<Path>>(path: P) -> TaxadbResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("reading name records from {}", path.display());
        let file = File::open(&path)?;
        Ok(NameRecords {
            lines: BufReader::new(file).lines(),
            path,
            line_no: 0,
        })
    }

    fn parse_line(&self, line: &str) -> TaxadbResult<NameRecord> {
        let fields = split_dump_line(line);
        if fields.len() < 2 {
            return Err(TaxadbError::Parse(format!(
                "{}:{}: expected at least 2 fields, got {}",
                self.path.display(),
                self.line_no,
                fields.len()
            )));
        }
        Ok(NameRecord {
            taxon_id: parse_taxon_id(fields[0], &self.path, self.line_no)?,
            scientific_name: fields[1].to_string(),
        })
    }
}

impl Iterator for NameRecords {
    type Item = TaxadbResult<NameRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_no += 1;
            // Synonyms, common names, and the rest do not contribute
            if !line.contains("scientific name") {
                continue;
            }
            return Some(self.parse_line(&line));
        }
    }
}
