//! Mica CLI - command-line interface for the Mica object database.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Mica - content-addressed object storage
#[derive(Parser, Debug)]
#[command(name = "mica")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize a new repository
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Compute an object id and optionally store the object
    HashObject {
        /// Write the object into the database
        #[arg(short = 'w', long)]
        write: bool,
        /// File to hash
        file: PathBuf,
    },

    /// Print the content of a stored object
    CatFile {
        /// Pretty-print the object payload
        #[arg(short = 'p', required = true)]
        pretty: bool,
        /// Object id (40 hex characters)
        object: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mica={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(path.as_deref()),
        Commands::HashObject { write, file } => commands::hash_object(&file, write),
        Commands::CatFile { object, .. } => commands::cat_file(&object),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
