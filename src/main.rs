//! # docgraph CLI
//!
//! The `docgraph` binary turns a document tree into node/edge CSV tables
//! and loads them into an SQLite graph store.
//!
//! ## Usage
//!
//! ```bash
//! docgraph [--config ./docgraph.toml] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docgraph extract <input> <output>` | Write the CSV tables for a document tree |
//! | `docgraph load <data>` | Rebuild the graph store from the CSV tables |
//! | `docgraph build <input> <output>` | `extract` followed by `load` |
//! | `docgraph stats` | Print node and edge counts of a graph store |
//!
//! Set `RUST_LOG=docgraph=debug` for per-document diagnostics on stderr.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use docgraph::config::{self, Config};
use docgraph::{load, pipeline, stats};

/// Front-matter to graph tables.
///
/// Every command accepts an optional `--config` flag pointing to a TOML
/// file with site, discovery, and graph settings. Without it the built-in
/// defaults are used.
#[derive(Parser)]
#[command(
    name = "docgraph",
    about = "Extract document front-matter into node/edge tables and load them into a graph store",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Extract front-matter tables from a document tree.
    ///
    /// Scans INPUT, parses every document's front-matter, and writes the
    /// seven node/edge CSV files into OUTPUT, replacing any previous run.
    /// Documents that cannot be parsed are reported and skipped.
    Extract {
        /// Directory containing the documents.
        input: PathBuf,
        /// Directory that receives the CSV tables.
        output: PathBuf,
    },

    /// Load CSV tables into a fresh graph store.
    ///
    /// Any existing store at the target path is deleted first.
    Load {
        /// Directory containing the CSV tables.
        data: PathBuf,
        /// Graph store path. Defaults to `graph.db_path`, else `<DATA>/graph.sqlite`.
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Extract tables and load them in one go.
    Build {
        /// Directory containing the documents.
        input: PathBuf,
        /// Directory that receives the CSV tables.
        output: PathBuf,
        /// Graph store path. Defaults to `graph.db_path`, else `<OUTPUT>/graph.sqlite`.
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Show node and edge counts of a graph store.
    Stats {
        /// Graph store path. Defaults to `graph.db_path`, else `./data/graph.sqlite`.
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn resolve_db(cfg: &Config, db: Option<PathBuf>, data_dir: &Path) -> PathBuf {
    db.unwrap_or_else(|| cfg.db_path_for(data_dir))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Extract { input, output } => {
            pipeline::run_extract(&cfg, &input, &output)?;
        }
        Commands::Load { data, db } => {
            let db_path = resolve_db(&cfg, db, &data);
            load::run_load(&data, &db_path).await?;
        }
        Commands::Build { input, output, db } => {
            pipeline::run_extract(&cfg, &input, &output)?;
            let db_path = resolve_db(&cfg, db, &output);
            load::run_load(&output, &db_path).await?;
        }
        Commands::Stats { db } => {
            let db_path = resolve_db(&cfg, db, Path::new("data"));
            stats::run_stats(&db_path).await?;
        }
    }

    Ok(())
}
