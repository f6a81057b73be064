use clap::Parser;
use erdsketch::diagram::{Action, Diagram};
use erdsketch::import::{Options, ingest, parse_file};
use erdsketch::infer::RelationshipInferrer;
use erdsketch::layout::GridLayout;
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Build an ER diagram document from CSV/TSV files.
#[derive(Parser, Debug)]
#[command(name = "erdsketch", version)]
struct Cli {
    /// Input files (.csv, .tsv, .xlsx, .xls)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Existing diagram document to add the tables to
    #[arg(long)]
    merge: Option<PathBuf>,

    /// Number of grid columns
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
    grid_cols: u16,

    /// Do not link same-named columns when neither is a primary key
    #[arg(long)]
    no_unkeyed_links: bool,

    /// Re-infer relationships across the whole merged diagram, keeping
    /// manual ones
    #[arg(long)]
    regenerate: bool,

    /// Log every placement and inferred relationship
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let current = match &cli.merge {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Failed to read {}: {}", path.display(), e);
                process::exit(1);
            });
            Diagram::from_json(&json).unwrap_or_else(|e| {
                eprintln!("{}: {}", path.display(), e);
                process::exit(1);
            })
        }
        None => Diagram::default(),
    };

    let mut files = Vec::new();
    for path in &cli.inputs {
        match parse_file(path) {
            Ok(parsed) => files.extend(parsed),
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        }
    }

    let options = Options {
        layout: GridLayout::new(cli.grid_cols as usize),
        inference: RelationshipInferrer {
            link_unkeyed_exact_matches: !cli.no_unkeyed_links,
        },
    };
    let ingested = ingest(&files, &current.tables, &options);
    let mut diagram = current.reduce(Action::LoadTables {
        tables: ingested.tables,
        relationships: ingested.relationships,
    });
    if cli.regenerate {
        diagram = diagram.regenerate_relationships(&options.inference);
    }

    let json = match diagram.to_json() {
        Ok(json) => json,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match cli.output {
        Some(path) => {
            if let Err(e) = fs::write(&path, &json) {
                eprintln!("Failed to write {}: {}", path.display(), e);
                process::exit(1);
            }
        }
        None => println!("{}", json),
    }
}
