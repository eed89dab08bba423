//! `asset-versioning`: resolve asset paths from the command line and validate configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use asset_versioning::logging;
use asset_versioning::{AssetsConfig, Packages};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "asset-versioning")]
#[command(about = "Resolve logical asset paths to versioned URLs", long_about = None)]
struct Cli {
    /// Configuration file; defaults to assets.config.json in the current directory.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log lookups and manifest loads at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the public URL of each path, one per line.
    Resolve {
        /// Named package to resolve through; the default package when omitted.
        #[arg(long, short)]
        package: Option<String>,

        /// Logical asset paths.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Validate the configuration and load every manifest.
    Check,
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging(cli.verbose) {
        eprintln!("asset-versioning warning: {err:#}");
    }

    if let Err(err) = run(cli) {
        eprintln!("asset-versioning error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let packages = config.build().context("invalid asset configuration")?;

    match cli.command {
        Command::Resolve { package, paths } => run_resolve(&packages, package.as_deref(), &paths),
        Command::Check => run_check(&packages),
    }
}

fn load_config(path: Option<&Path>) -> Result<AssetsConfig> {
    match path {
        Some(path) => Ok(AssetsConfig::from_path(path)?),
        None => {
            let cwd = std::env::current_dir().context("failed to determine current directory")?;
            Ok(AssetsConfig::discover(&cwd)?)
        }
    }
}

fn run_resolve(packages: &Packages, package: Option<&str>, paths: &[String]) -> Result<()> {
    let resolver = packages.package(package)?;
    for path in paths {
        let url = resolver
            .resolve(path)
            .with_context(|| format!("failed to resolve {path}"))?;
        println!("{url}");
    }
    Ok(())
}

fn run_check(packages: &Packages) -> Result<()> {
    println!("{:<16} {:<10} {}", "PACKAGE", "STATUS", "DETAIL");
    let mut failures = 0usize;

    for (name, resolver) in packages.iter() {
        match resolver.warm() {
            Ok(()) => println!("{:<16} {:<10} {}", name, "ok", resolver.strategy().describe()),
            Err(err) => {
                failures += 1;
                println!("{:<16} {:<10} {}", name, "error", err);
            }
        }
    }

    anyhow::ensure!(failures == 0, "{failures} package(s) failed to load");
    Ok(())
}
