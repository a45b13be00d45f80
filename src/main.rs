//! `license-bom` attributes open-source licenses to every project in a Go
//! dependency closure.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and load the config ([`config::load_config`]).
//! 2. Resolve the dependency closure through the build graph ([`graph`]).
//! 3. Locate and score license files per package ([`aggregate::Aggregator`]).
//! 4. Group packages sharing a license file into projects ([`aggregate::group_licenses`]).
//! 5. Apply overrides ([`overrides::merge`]).
//! 6. Print the attributions, then the entries needing attention.
//! 7. Exit `0` (clean) or `1` (at least one entry needs attention).

mod aggregate;
mod cli;
mod config;
mod error;
mod graph;
mod license;
mod locator;
mod models;
mod overrides;
mod report;
#[cfg(test)]
mod testutil;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use aggregate::{attributions, group_licenses, Aggregator};
use cli::{Cli, ReportFormat};
use config::load_config;
use graph::go::GoList;
use graph::{BuildGraph, GraphError};
use license::template::Corpus;
use overrides::{load_overrides, merge};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    // Config overrides first, override file entries after them
    let mut forced = config.overrides;
    if let Some(path) = &cli.override_file {
        forced.extend(load_overrides(path)?);
    }

    let gopath = cli.gopath.clone().or(config.graph.gopath);
    let graph = GoList::new(config.graph.go, gopath);
    let closure = match graph.closure(&cli.packages) {
        Ok(closure) => closure,
        Err(GraphError::Missing(output)) => {
            eprintln!("{} package not found:\n{}", "error:".red().bold(), output.trim_end());
            std::process::exit(1);
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("could not list {} dependencies", cli.packages.join(" ")));
        }
    };

    let corpus = Corpus::embedded()?;
    let mut aggregator = Aggregator::new(&corpus)?;

    let pb = if !cli.quiet {
        let pb = ProgressBar::new(closure.packages.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let licenses = aggregator.list_licenses(&closure.packages, &closure.standard, pb.as_ref())?;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let licenses = group_licenses(licenses)?;
    let (detected, needs_attention) = attributions(&licenses);
    let (detected, needs_attention) = merge(detected, needs_attention, &forced);

    match cli.report {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&detected)?);
            if !needs_attention.is_empty() {
                println!();
                println!("{}", serde_json::to_string_pretty(&needs_attention)?);
            }
        }
        ReportFormat::Terminal => {
            let details = cli.verbose.then_some(licenses.as_slice());
            report::terminal::render(&detected, &needs_attention, details, cli.quiet)?;
        }
    }

    if !needs_attention.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable. `LICENSE_BOM_LOG` takes
/// an `EnvFilter` directive and wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "license_bom=debug"
    } else {
        "license_bom=warn"
    };
    let filter =
        EnvFilter::try_from_env("LICENSE_BOM_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
