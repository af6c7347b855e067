//! Command-line player for the Umbra interactive fiction engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "umbra",
    about = "Umbra: a text adventure about fairgrounds, dreams and the dark",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that starts a session.
#[derive(Args, Debug, Default)]
struct SessionArgs {
    /// Directory of JSON content files (default: built-in world)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Highest progression layer to load
    #[arg(long)]
    max_layer: Option<u32>,

    /// TOML file with engine settings; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resume from a save file
    #[arg(short, long)]
    load: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively, reading commands from stdin
    Play {
        #[command(flatten)]
        session: SessionArgs,

        /// Write the session here on quit or end of input
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Print the narrative constraints of a session as JSON
    Constraints {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Validate a content directory
    Check {
        /// Directory of JSON content files
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play { session, save } => commands::play::run(&session, save.as_deref()),
        Commands::Constraints { session } => commands::constraints::run(&session),
        Commands::Check { data } => commands::check::run(&data),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
