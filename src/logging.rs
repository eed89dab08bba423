//! Logging init for the command-line tool: structured output on stderr.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "warn,asset_versioning=info";
const VERBOSE_DIRECTIVES: &str = "info,asset_versioning=debug";

/// Build the filter from `RUST_LOG`, or from the built-in directives when it is unset.
pub fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_DIRECTIVES
        } else {
            DEFAULT_DIRECTIVES
        })
    })
}

/// Install the global subscriber writing to stderr so stdout stays reserved for results.
///
/// Returns an error when a global subscriber is already installed.
pub fn init_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialise logging: {err}"))?;

    tracing::debug!("asset_versioning logging initialised");
    Ok(())
}
