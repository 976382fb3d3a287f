//! # ss
//!
//! Prints the central Secret copies and the generated SyncSet/SelectorSyncSet for a
//! set of manifest directories. See [`syncset_generator::cli`] for usage.

use anyhow::Result;
use clap::Parser;
use syncset_generator::cli::{run, Cli};
use syncset_generator::observability::init_logging;
use syncset_generator::GeneratorConfig;
use tracing::debug;

fn main() -> Result<()> {
    let config = GeneratorConfig::from_env();
    init_logging(&config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let cli = Cli::parse();
    debug!("Running with {:?}", cli.command);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&cli, &config, &mut out)
}
