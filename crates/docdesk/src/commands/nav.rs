//! `docdesk nav` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use docdesk_config::{CliSettings, Config};
use docdesk_renderer::DocRenderer;
use docdesk_storage::{DocStore, FsStore};
use docdesk_view::normalize;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Version identifier (defaults to the configured initial version).
    version: Option<String>,

    /// Document storage root (overrides config).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover docdesk.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl NavArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            storage_root: self.root.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let version = self.version.as_deref().unwrap_or(&config.initial.version);
        let version = normalize(version);

        let store: Arc<dyn DocStore> =
            Arc::new(FsStore::new(config.storage_resolved.root.clone()));
        let html = DocRenderer::new(store).render_nav(version)?;

        output.page(&html)?;
        Ok(())
    }
}
