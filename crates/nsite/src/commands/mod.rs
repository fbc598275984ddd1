//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod collections;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use nsite_collections::{
    CollectionRegistry, GenerationReport, Generator, GeneratorOptions, LayoutMode, LayoutOptions,
};
use nsite_config::{CliSettings, Config, LayoutModeConfig};
use nsite_source::{ContentSource, ExportOptions, SnapshotSource};

use crate::error::CliError;
use crate::output::Output;

pub(crate) use build::BuildArgs;
pub(crate) use collections::CollectionsArgs;

/// Arguments shared by every command that runs a generation pass.
#[derive(Args)]
pub(crate) struct PassArgs {
    /// Path to configuration file (default: auto-discover nsite.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content snapshot directory (overrides config).
    #[arg(long, env = "NSITE_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl PassArgs {
    /// Load configuration, applying `output_dir` on top of the file values.
    pub(crate) fn load_config(&self, output_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            cache_dir: self.cache_dir.clone(),
            output_dir,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Generator settings derived from configuration.
pub(crate) fn generator_options(config: &Config) -> GeneratorOptions {
    let mode = match config.layouts.mode {
        LayoutModeConfig::Normalized => LayoutMode::Normalized,
        LayoutModeConfig::Verbatim => LayoutMode::Verbatim,
    };
    GeneratorOptions {
        layouts: LayoutOptions {
            dir: config.layouts.dir.clone(),
            extension: config.layouts.extension.clone(),
            default_name: config.layouts.default.clone(),
            mode,
        },
        export: config.export.enabled.then(|| ExportOptions {
            path: config.export.path.clone(),
            pretty: config.export.pretty,
        }),
        fixed: config.collections.fixed.clone(),
    }
}

/// Run one generation pass over the configured snapshot.
pub(crate) fn run_pass(config: &Config, output: &Output) -> (CollectionRegistry, GenerationReport) {
    tracing::info!(
        cache_dir = %config.source.cache_dir.display(),
        database_id = config.source.database_id.as_deref().unwrap_or("-"),
        api_key_set = config.source.api_key.is_some(),
        "Loading content snapshot"
    );

    let source: Arc<dyn ContentSource> =
        Arc::new(SnapshotSource::new(config.source.cache_dir.clone()));
    let mut registry = CollectionRegistry::new();
    let report = Generator::new(source, generator_options(config)).run(&mut registry);

    if let Some(err) = &report.pull_error {
        output.warning(&format!("Content pull failed, using cached tree: {err}"));
    }

    (registry, report)
}
