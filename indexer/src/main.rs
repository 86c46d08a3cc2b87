use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use linuxmap_core::dataset::load_dataset;
use linuxmap_core::protocol::{FilterResults, SearchResults};
use linuxmap_core::{EngineConfig, FilterCriteria, SearchEngine};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the Linux map search index and query it from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Source {
    /// Dataset document or directory of *.json documents
    #[arg(long)]
    input: PathBuf,
    /// Engine config (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print its statistics
    Stats {
        #[command(flatten)]
        source: Source,
    },
    /// Run one query against the index
    Search {
        #[command(flatten)]
        source: Source,
        #[arg(long)]
        query: String,
    },
    /// List nodes matching every given criterion
    Filter {
        #[command(flatten)]
        source: Source,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        level: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = false)]
        has_commands: bool,
        #[arg(long, default_value_t = false)]
        has_examples: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Stats { source } => {
            let engine = open(&source)?;
            print_json(&engine.stats())
        }
        Commands::Search { source, query } => {
            let engine = open(&source)?;
            let results = engine.search(&query);
            print_json(&SearchResults { query, results, seq: None })
        }
        Commands::Filter { source, kind, level, category, has_commands, has_examples } => {
            let engine = open(&source)?;
            let criteria = FilterCriteria { kind, level, category, has_commands, has_examples };
            let results = engine.filter(&criteria);
            print_json(&FilterResults { criteria, results, seq: None })
        }
    }
}

fn open(source: &Source) -> Result<SearchEngine> {
    let config = EngineConfig::load(source.config.as_deref())?;
    let raw = load_dataset(&source.input)?;
    let mut engine = SearchEngine::new(config);
    let index_size = engine.init(raw);
    tracing::info!(input = %source.input.display(), index_size, "index ready");
    Ok(engine)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
