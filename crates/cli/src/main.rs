//! depgraph CLI — file-discovery and rendering front-end for
//! `depgraph-core`. Owns everything spec.md §1 explicitly keeps out of the
//! core: argument parsing, `.gitignore`-aware discovery, the filesystem
//! `ContentReader`, and DOT/Mermaid/JSON rendering.

mod config;
mod discovery;
mod output;

use anyhow::{Context as _, Result};
use clap::Parser;
use depgraph_core::{build_dependency_graph, find_path_nodes, FsContentReader, LanguageModule};
use output::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "depgraph")]
#[command(about = "Polyglot static dependency-graph engine", long_about = None)]
#[command(version = depgraph_core::VERSION)]
struct Cli {
    /// Root directory to scan (default: current directory).
    root: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "dot")]
    format: OutputFormat,

    /// Restrict the output to the subgraph lying between these files
    /// (comma-separated, relative to `root`). Two or more are needed for
    /// `FindPathNodes` to do anything beyond echoing the targets back.
    #[arg(long, value_delimiter = ',')]
    path_between: Vec<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let root = cli.root.unwrap_or_else(|| PathBuf::from("."));
    let root = root
        .canonicalize()
        .with_context(|| format!("failed to resolve root directory {}", root.display()))?;

    let cfg = config::DepgraphConfig::find_and_load(&root)?;
    let modules = depgraph_core::registry::registry();
    let files: Vec<PathBuf> = discovery::discover_files(&root, &cfg.ignore)?
        .into_iter()
        .filter(|path| {
            depgraph_core::registry::module_for_path(&modules, path)
                .map(|m| cfg.is_language_enabled(m.name()))
                .unwrap_or(true)
        })
        .collect();

    let reader = FsContentReader;
    let outcome = build_dependency_graph(&files, &reader)
        .context("failed to build dependency graph")?;

    for diag in &outcome.diagnostics {
        tracing::warn!(file = %diag.file.display(), message = %diag.message, "parse diagnostic");
    }

    let graph = if cli.path_between.is_empty() {
        outcome.graph
    } else {
        let targets: Vec<PathBuf> = cli
            .path_between
            .iter()
            .map(|p| root.join(p))
            .collect();
        find_path_nodes(&outcome.graph, &targets)
    };

    let rendered = match cli.format {
        OutputFormat::Dot => output::dot::render(&graph, &root),
        OutputFormat::Mermaid => output::mermaid::render(&graph, &root),
        OutputFormat::Json => output::json::render(&graph, &root)?,
    };
    println!("{rendered}");
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
