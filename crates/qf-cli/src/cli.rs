//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Flattens prioritized JORE quay versions into one timeline per public code.
///
/// Reads stop places as JSON lines, one stop place per line.
#[derive(Debug, Parser)]
#[command(name = "qf", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write stop places with their quay versions flattened.
    Flatten(FlattenArgs),

    /// Print the flattened timeline of every public code.
    Inspect(InspectArgs),
}

#[derive(Debug, Args)]
pub struct FlattenArgs {
    /// Input file of stop places as JSON lines (default: stdin).
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (default: stdout). Only written once every stop place succeeded.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Input file of stop places as JSON lines (default: stdin).
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}
