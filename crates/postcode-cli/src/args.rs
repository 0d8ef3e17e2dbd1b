use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for postcode-cli
#[derive(Debug, Parser)]
#[command(
    name = "postcode",
    version,
    about = "Fuzzy postcode lookup over a local dataset"
)]
pub struct CliArgs {
    /// Dataset to index: `.txt`/`.csv` (first column) or `.json`, optionally `.gz`
    #[arg(short = 'i', long = "input", global = true)]
    pub input: Option<PathBuf>,

    /// JSON engine configuration; flags below override it
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Largest edit distance the fuzzy search may widen to
    #[arg(long = "max-radius", global = true)]
    pub max_radius: Option<usize>,

    /// Disable the result cache
    #[arg(long = "no-cache", global = true)]
    pub no_cache: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the index
    Stats,

    /// List the ranked candidates for a query
    Search {
        query: String,

        /// How many candidates to print
        #[arg(short = 'n', long = "top", default_value_t = 5)]
        top: usize,
    },

    /// Print the single best candidate, or report that none is close enough
    Best { query: String },

    /// Check whether a code has the UK postcode shape
    Validate { code: String },

    /// Build the index and write it as a snapshot
    Build {
        #[arg(short = 'o', long = "out")]
        out: PathBuf,
    },
}
