//! `nsite build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use nsite_collections::CollectionRegistry;

use super::{PassArgs, run_pass};
use crate::error::CliError;
use crate::output::Output;

/// Name of the file written into the output directory.
pub(crate) const COLLECTIONS_FILENAME: &str = "collections.json";

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub pass: PassArgs,

    /// Output directory for collections.json (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.pass.load_config(self.output_dir)?;

        let (registry, report) = run_pass(&config, &output);
        let path = write_collections(&registry, &config.output.dir, !self.compact)?;

        output.info(&format!(
            "Pages: {}, navigation pages: {}",
            report.pages, report.nav_pages
        ));
        output.success(&format!(
            "Wrote {} collections to {}",
            registry.len(),
            path.display()
        ));
        Ok(())
    }
}

/// Evaluate every collection and write them as one JSON object.
fn write_collections(
    registry: &CollectionRegistry,
    output_dir: &Path,
    pretty: bool,
) -> Result<PathBuf, CliError> {
    let collections = registry.evaluate_all();
    let json = if pretty {
        serde_json::to_string_pretty(&collections)?
    } else {
        serde_json::to_string(&collections)?
    };

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(COLLECTIONS_FILENAME);
    std::fs::write(&path, json)?;
    tracing::info!(path = %path.display(), collections = collections.len(), "Wrote collections");
    Ok(path)
}
