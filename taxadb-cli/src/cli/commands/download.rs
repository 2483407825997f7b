use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use taxadb_core::{Config, NCBIDataset};

use crate::download::{extract_tar_gz, NCBIDownloader};

#[derive(Args)]
pub struct DownloadArgs {
    /// Output directory for the downloaded files
    #[arg(short, long, value_name = "DIR")]
    pub outdir: PathBuf,

    /// Datasets to fetch (default: all of them)
    #[arg(long, value_name = "NAME", num_args = 1..)]
    pub datasets: Vec<String>,

    /// Re-download files that are already present
    #[arg(short, long)]
    pub force: bool,

    /// Override the NCBI base URL from the configuration
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

pub fn run(args: DownloadArgs, config: &Config) -> Result<()> {
    let datasets = selected_datasets(&args.datasets)?;

    std::fs::create_dir_all(&args.outdir).with_context(|| {
        format!("failed to create output directory {}", args.outdir.display())
    })?;

    let mut download_config = config.download.clone();
    if let Some(base_url) = &args.base_url {
        download_config.base_url = base_url.clone();
    }
    let downloader = NCBIDownloader::new(&download_config)?;

    for dataset in &datasets {
        println!("{} Downloading {}...", "►".cyan().bold(), dataset);
        let path = downloader.fetch(*dataset, &args.outdir, args.force)?;
        println!("{} {} verified", "✓".green().bold(), path.display());

        if *dataset == NCBIDataset::Taxdump {
            println!("{} Unpacking {}...", "►".cyan().bold(), dataset.file_name());
            extract_tar_gz(&path, &args.outdir)?;
            println!(
                "{} nodes.dmp and names.dmp unpacked into {}",
                "✓".green().bold(),
                args.outdir.display()
            );
        }
    }

    println!(
        "{} {} dataset(s) ready in {}",
        "✓".green().bold(),
        datasets.len(),
        args.outdir.display()
    );
    Ok(())
}

fn selected_datasets(names: &[String]) -> Result<Vec<NCBIDataset>> {
    if names.is_empty() {
        return Ok(NCBIDataset::all().to_vec());
    }
    let mut datasets = Vec::with_capacity(names.len());
    for name in names {
        datasets.push(NCBIDataset::parse(name)?);
    }
    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_names_selects_every_dataset() {
        let datasets = selected_datasets(&[]).unwrap();
        assert_eq!(datasets.len(), 6);
        assert_eq!(datasets[0], NCBIDataset::Taxdump);
    }

    #[test]
    fn test_named_subset_preserves_order() {
        let names = vec!["prot".to_string(), "taxdump".to_string()];
        let datasets = selected_datasets(&names).unwrap();
        assert_eq!(datasets, vec![NCBIDataset::Prot, NCBIDataset::Taxdump]);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let names = vec!["refseq".to_string()];
        let result = selected_datasets(&names);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("refseq"));
    }
}
