//! NKG CLI - Command-line interface
//!
//! Usage:
//!   nkg extract [PATH]
//!   nkg graph [PATH] --format dot --output graph.dot
//!   nkg vocab
//!
//! Author: hephaex@gmail.com

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nkg_core::{AppConfig, OutputFormat};
use nkg_extractor::EventPipeline;
use nkg_graph::{exporter_for, GraphBuilder};

const DEFAULT_INPUT: &str = "criminal_statement.txt";

#[derive(Parser)]
#[command(name = "nkg")]
#[command(about = "Narrative knowledge graph CLI")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract events from a statement and print them as JSON
    Extract {
        /// Statement text file
        #[arg(default_value = DEFAULT_INPUT)]
        path: PathBuf,
    },
    /// Build the statement/attribute graph
    Graph {
        /// Statement text file
        #[arg(default_value = DEFAULT_INPUT)]
        path: PathBuf,

        /// Output format (json, dot)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Vocab,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    config.validate()?;

    init_tracing(&config);

    match cli.command {
        Commands::Extract { path } => {
            let text = read_statement(&path).await?;
            let output = EventPipeline::from_config(&config)?.run(&text);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Graph {
            path,
            format,
            output,
        } => {
            let text = read_statement(&path).await?;
            let events = EventPipeline::from_config(&config)?.extract_events(&text);
            let graph = GraphBuilder::new().build(&events);

            let format = format.unwrap_or(config.output.format);
            let rendered = exporter_for(format).export(&graph)?;

            match output.or_else(|| config.output.path.clone()) {
                Some(target) => {
                    tokio::fs::write(&target, rendered)
                        .await
                        .with_context(|| format!("Failed to write {}", target.display()))?;
                    tracing::info!(
                        path = %target.display(),
                        %format,
                        nodes = graph.node_count(),
                        edges = graph.edge_count(),
                        "Wrote graph"
                    );
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Vocab => {
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn read_statement(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read statement {}", path.display()))
}
