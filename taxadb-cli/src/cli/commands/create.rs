use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use taxadb_core::{Config, NCBIDataset, TaxadbError};
use taxadb_dump::{merge_taxa, AccessionRecords, NameRecords, NodeRecords};
use taxadb_store::TaxonomyStore;

#[derive(Args)]
pub struct CreateArgs {
    /// Directory holding the downloaded taxonomy files
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Name of the database to be created
    #[arg(short = 'd', long, default_value = "taxadb")]
    pub dbname: String,

    /// Type of the database to be created
    #[arg(short = 't', long, default_value = "sqlite", value_parser = ["sqlite"])]
    pub dbtype: String,
}

pub fn run(args: CreateArgs, config: &Config) -> Result<()> {
    let started = Instant::now();

    let nodes_path = args.input.join("nodes.dmp");
    let names_path = args.input.join("names.dmp");
    for path in [&nodes_path, &names_path] {
        if !path.exists() {
            return Err(TaxadbError::NotFound(format!(
                "{} (run 'taxadb download' first)",
                path.display()
            ))
            .into());
        }
    }

    let db_path = PathBuf::from(format!("{}.{}", args.dbname, args.dbtype));
    println!(
        "{} Creating taxonomy store {}...",
        "►".cyan().bold(),
        db_path.display()
    );
    let store = TaxonomyStore::open(&db_path)?;
    store.create_schema()?;

    println!(
        "{} Merging nodes.dmp and names.dmp from {}...",
        "►".cyan().bold(),
        args.input.display()
    );
    let taxa = merge_taxa(
        NodeRecords::open(&nodes_path)?,
        NameRecords::open(&names_path)?,
    )?;
    let loaded = store.load_taxa(&taxa, config.database.taxa_batch_size)?;
    println!("{} Loaded {} taxa", "✓".green().bold(), loaded);

    for dataset in NCBIDataset::accession_sets() {
        let path = args.input.join(dataset.file_name());
        if !path.exists() {
            println!(
                "{} {} not found in {}, skipping",
                "⚠".yellow().bold(),
                dataset.file_name(),
                args.input.display()
            );
            continue;
        }

        let spinner = accession_spinner(dataset.file_name());
        let records = AccessionRecords::open(&path)?.inspect(|_| spinner.inc(1));
        let result = store.load_accessions(records);
        spinner.finish_and_clear();
        let inserted = result?;
        println!(
            "{} {} added to database ({} accessions)",
            "✓".green().bold(),
            dataset.file_name(),
            inserted
        );
    }

    let taxon_count = store.taxon_count()?;
    let accession_count = store.accession_count()?;
    store.close()?;

    println!(
        "{} {} ready: {} taxa, {} accessions in {:.1?}",
        "✓".green().bold(),
        db_path.display(),
        taxon_count,
        accession_count,
        started.elapsed()
    );
    Ok(())
}

fn accession_spinner(file_name: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}: {pos} records")
            .unwrap(),
    );
    pb.set_message(file_name.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
