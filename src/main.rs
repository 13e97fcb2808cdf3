//! Distill CLI entry point

use clap::{Parser, Subcommand};
use distill_java::HelperConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "distill")]
#[command(about = "Canonical declaration trees and revision histories for Java sources", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to distill.toml in the current directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the declarations of a file
    Structure {
        file: PathBuf,
    },
    /// Print declaration trees of every type, or of one declaration
    Tree {
        file: PathBuf,

        /// Qualified name of the declaration to convert
        #[arg(short, long)]
        name: Option<String>,

        /// Print JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },
    /// Print the statement tree of a method body
    Body {
        file: PathBuf,

        /// Qualified name of the method, e.g. `pkg.A.put(Map,int)`
        name: String,

        /// Print JSON instead of an indented listing
        #[arg(long)]
        json: bool,
    },
    /// Record each file as one revision and print the resulting histories
    History {
        /// Revisions, oldest first
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Version label per file, in the same order
        #[arg(short, long = "label")]
        labels: Vec<String>,

        /// JSON history store to merge into and save
        #[arg(short, long)]
        store: Option<PathBuf>,
    },
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries trees and summaries.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "distill={log_level},distill_core={log_level},distill_java={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = HelperConfig::discover(cli.config.as_deref(), &std::env::current_dir()?)?;
    tracing::debug!("Using config {:?}", config);

    match cli.command {
        Commands::Structure { file } => commands::structure(&file, &config),
        Commands::Tree { file, name, json } => commands::tree(&file, name.as_deref(), json, &config),
        Commands::Body { file, name, json } => commands::body(&file, &name, json, &config),
        Commands::History {
            files,
            labels,
            store,
        } => commands::history(&files, &labels, store.as_deref(), &config),
        Commands::Version => {
            println!("distill v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
