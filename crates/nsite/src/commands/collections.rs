//! `nsite collections` command implementation.

use clap::Args;

use super::{PassArgs, run_pass};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the collections command.
#[derive(Args)]
pub(crate) struct CollectionsArgs {
    #[command(flatten)]
    pub pass: PassArgs,
}

impl CollectionsArgs {
    /// Execute the collections command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.pass.load_config(None)?;

        let (registry, report) = run_pass(&config, &output);

        for name in registry.names() {
            let size = registry.evaluate(name).map_or(0, |pages| pages.len());
            output.collection(name, size);
        }
        output.info(&format!(
            "{} collections, {} pages, {} with sub-pages",
            registry.len(),
            report.pages,
            report.nav_pages
        ));
        Ok(())
    }
}
