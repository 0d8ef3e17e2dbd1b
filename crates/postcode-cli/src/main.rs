//! postcode: command-line front end for postcode-core
//!
//! Loads a dataset (through its snapshot when one is fresh), then answers a
//! single query and exits.
//!
//! Usage examples
//! --------------
//!
//! - Ranked candidates for a mistyped code
//!   $ postcode -i postcodes.csv search "e14 9w"
//!
//! - Best candidate, with the auto-select verdict
//!   $ postcode -i postcodes.csv best e149wb
//!
//! - Stricter fuzzy search, no cache
//!   $ postcode -i postcodes.csv --max-radius 1 --no-cache search SW1A1AB
//!
//! - Shape check only; needs no dataset
//!   $ postcode validate "SW1A 1AA"
//!
//! Logging goes to stderr and is controlled by `POSTCODE_LOG`
//! (default `warn`).
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use postcode_core::format::{display_form, is_valid_uk_format};
use postcode_core::{EngineConfig, IndexBuilder, Normalizer, PostcodeIndex, PostcodeSearch};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = load_config(&args)?;

    match args.command {
        Commands::Validate { code } => {
            if is_valid_uk_format(&code) {
                let key = Normalizer::new(config.normalizer).normalize(&code)?;
                println!("valid: {}", display_form(key.as_str()));
            } else {
                println!("not a UK postcode: {code}");
            }
        }

        Commands::Build { out } => {
            let input = require_input(args.input.as_deref())?;
            let builder = IndexBuilder::new(Normalizer::new(config.normalizer));
            let index = PostcodeIndex::load_from_dataset(input, &builder)
                .with_context(|| format!("building index from {}", input.display()))?;
            index.save_as(&out)?;
            let report = index.report();
            println!(
                "Wrote {} codes to {} ({} duplicates, {} skipped)",
                index.len(),
                out.display(),
                report.duplicates,
                report.skipped
            );
        }

        Commands::Stats => {
            let engine = open_engine(&args.input, config)?;
            let Some(index) = engine.index() else {
                bail!("index not ready");
            };
            let stats = index.stats();
            let report = index.report();
            println!("Index statistics:");
            println!("  Codes: {}", stats.codes);
            println!("  Trie nodes: {}", stats.trie_nodes);
            println!("  BK-tree depth: {}", stats.bk_depth);
            println!("  Code length: {}..={}", stats.min_code_len, stats.max_code_len);
            println!("  Duplicates dropped: {}", report.duplicates);
            println!("  Entries skipped: {}", report.skipped);
        }

        Commands::Search { query, top } => {
            let engine = open_engine(&args.input, config)?;
            let outcome = engine.search(&query)?;
            if outcome.results.is_empty() {
                println!("No postcode close to: {query}");
            }
            for (rank, r) in outcome.results.iter().take(top).enumerate() {
                println!(
                    "{}. {} (distance {}, confidence {:.2}){}",
                    rank + 1,
                    r.original_text(),
                    r.edit_distance(),
                    r.confidence,
                    if r.auto_selected { " [auto]" } else { "" }
                );
            }
            tracing::debug!(
                strategy = ?outcome.strategy,
                elapsed_us = outcome.elapsed.as_micros() as u64,
                "search done"
            );
        }

        Commands::Best { query } => {
            let engine = open_engine(&args.input, config)?;
            match engine.best_match(&query)? {
                Some(best) if best.auto_selected => {
                    println!("{} (confidence {:.2})", best.original_text, best.confidence);
                }
                Some(best) => {
                    println!(
                        "Did you mean {}? (confidence {:.2}, please confirm)",
                        best.original_text, best.confidence
                    );
                }
                None => println!("No postcode close to: {query}"),
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("POSTCODE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// File config first, then flag overrides.
fn load_config(args: &CliArgs) -> anyhow::Result<EngineConfig> {
    let mut config = match &args.config {
        #[cfg(feature = "json")]
        Some(path) => EngineConfig::load_from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        #[cfg(not(feature = "json"))]
        Some(_) => bail!("--config needs the 'json' feature"),
        None => EngineConfig::default(),
    };
    if let Some(radius) = args.max_radius {
        config.query = config.query.with_max_radius(radius);
    }
    if args.no_cache {
        config = config.without_cache();
    }
    Ok(config)
}

fn require_input(input: Option<&Path>) -> anyhow::Result<&Path> {
    match input {
        Some(path) => Ok(path),
        None => bail!("no dataset given; pass --input <file>"),
    }
}

fn open_engine(input: &Option<PathBuf>, config: EngineConfig) -> anyhow::Result<PostcodeSearch> {
    let input = require_input(input.as_deref())?;
    let engine = PostcodeSearch::new(config);
    engine
        .initialize_from_path(input)
        .with_context(|| format!("loading {}", input.display()))?;
    Ok(engine)
}
