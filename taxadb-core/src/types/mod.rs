//! Record types shared across the taxonomy snapshot pipeline

use crate::error::{TaxadbError, TaxadbResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of the taxonomic tree, merged from nodes.dmp and names.dmp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxon {
    /// NCBI taxon identifier, unique within a snapshot
    pub taxon_id: u32,
    /// Identifier of the parent node; the NCBI root references itself
    pub parent_taxon_id: u32,
    /// Scientific name from names.dmp, empty when no line matched
    pub scientific_name: String,
    /// Rank label from nodes.dmp such as "species" or "genus"
    pub rank: String,
}

/// A sequence accession mapped to the taxon it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accession {
    /// External sequence identifier, not unique across input files
    pub accession_number: String,
    /// Identifier of the owning [`Taxon`]
    pub taxon_id: u32,
}

/// Files published under the NCBI taxonomy tree that taxadb can fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NCBIDataset {
    /// Archive containing nodes.dmp and names.dmp
    Taxdump,
    /// EST nucleotide accessions
    NuclEst,
    /// GenBank nucleotide accessions
    NuclGb,
    /// GSS nucleotide accessions
    NuclGss,
    /// Whole genome shotgun nucleotide accessions
    NuclWgs,
    /// Protein accessions
    Prot,
}

impl NCBIDataset {
    /// Short key used on the command line
    pub fn name(&self) -> &str {
        match self {
            NCBIDataset::Taxdump => "taxdump",
            NCBIDataset::NuclEst => "nucl_est",
            NCBIDataset::NuclGb => "nucl_gb",
            NCBIDataset::NuclGss => "nucl_gss",
            NCBIDataset::NuclWgs => "nucl_wgs",
            NCBIDataset::Prot => "prot",
        }
    }

    /// File name as published by NCBI
    pub fn file_name(&self) -> &str {
        match self {
            NCBIDataset::Taxdump => "taxdump.tar.gz",
            NCBIDataset::NuclEst => "nucl_est.accession2taxid.gz",
            NCBIDataset::NuclGb => "nucl_gb.accession2taxid.gz",
            NCBIDataset::NuclGss => "nucl_gss.accession2taxid.gz",
            NCBIDataset::NuclWgs => "nucl_wgs.accession2taxid.gz",
            NCBIDataset::Prot => "prot.accession2taxid.gz",
        }
    }

    /// Path of the file relative to the NCBI base URL
    pub fn remote_path(&self) -> String {
        match self {
            NCBIDataset::Taxdump => format!("pub/taxonomy/{}", self.file_name()),
            _ => format!("pub/taxonomy/accession2taxid/{}", self.file_name()),
        }
    }

    /// All datasets fetched by a full download
    pub fn all() -> [NCBIDataset; 6] {
        [
            NCBIDataset::Taxdump,
            NCBIDataset::NuclEst,
            NCBIDataset::NuclGb,
            NCBIDataset::NuclGss,
            NCBIDataset::NuclWgs,
            NCBIDataset::Prot,
        ]
    }

    /// The accession2taxid mapping datasets, in load order
    pub fn accession_sets() -> [NCBIDataset; 5] {
        [
            NCBIDataset::NuclEst,
            NCBIDataset::NuclGb,
            NCBIDataset::NuclGss,
            NCBIDataset::NuclWgs,
            NCBIDataset::Prot,
        ]
    }

    /// Parse a dataset from its command line key
    pub fn parse(s: &str) -> TaxadbResult<NCBIDataset> {
        match s.to_lowercase().as_str() {
            "taxdump" => Ok(NCBIDataset::Taxdump),
            "nucl_est" => Ok(NCBIDataset::NuclEst),
            "nucl_gb" => Ok(NCBIDataset::NuclGb),
            "nucl_gss" => Ok(NCBIDataset::NuclGss),
            "nucl_wgs" => Ok(NCBIDataset::NuclWgs),
            "prot" => Ok(NCBIDataset::Prot),
            _ => Err(TaxadbError::InvalidInput(format!(
                "unknown dataset '{}' (expected one of: taxdump, nucl_est, nucl_gb, nucl_gss, nucl_wgs, prot)",
                s
            ))),
        }
    }
}

impl fmt::Display for NCBIDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
