//! Streaming parser for accession2taxid mapping files

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use taxadb_core::{Accession, TaxadbError, TaxadbResult};
use tracing::debug;

/// Lazy cursor over a tab-delimited accession2taxid file.
///
/// Files ending in `.gz` are decompressed on the fly. The first line is
/// the column header (`accession accession.version taxid gi`) and is
/// consumed on open; records keep only the accession and taxid columns.
pub struct AccessionRecords {
    lines: Lines<Box<dyn BufRead>>,
    path: PathBuf,
    line_no: usize,
}

impl AccessionRecords {
    pub fn open<P: AsRef<Path>>(path: P) -> TaxadbResult<Self> {
        let path = path.as_ref().to_path_buf();
        debug!("reading accession records from {}", path.display());
        let file = File::open(&path)?;
        let reader: Box<dyn BufRead> = if path.extension().and_then(|e| e.to_str()) == Some("gz")
        {
            Box::new(BufReader::new(GzDecoder::new(BufReader::new(file))))
        } else {
            Box::new(BufReader::new(file))
        };

        let mut lines = reader.lines();
        let mut line_no = 0;
        // Column header; an empty file simply yields no records
        if lines.next().transpose()?.is_some() {
            line_no = 1;
        }

        Ok(AccessionRecords {
            lines,
            path,
            line_no,
        })
    }

    fn parse_line(&self, line: &str) -> TaxadbResult<Accession> {
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < 3 {
            return Err(TaxadbError::Parse(format!(
                "{}:{}: expected at least 3 columns, got {}",
                self.path.display(),
                self.line_no,
                columns.len()
            )));
        }
        let taxon_id = columns[2].parse().map_err(|_| {
            TaxadbError::Parse(format!(
                "{}:{}: invalid taxon id '{}'",
                self.path.display(),
                self.line_no,
                columns[2]
            ))
        })?;
        Ok(Accession {
            accession_number: columns[0].to_string(),
            taxon_id,
        })
    }
}

impl Iterator for AccessionRecords {
    type Item = TaxadbResult<Accession>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = match self.lines.next()? {
            Ok(line) => line,
            Err(e) => return Some(Err(e.into())),
        };
        self.line_no += 1;
        Some(self.parse_line(&line))
    }
}
