//! `docdesk list` command implementation.

use std::path::PathBuf;

use clap::Args;
use docdesk_config::{CliSettings, Config};
use docdesk_storage::{DocStore, FsStore};
use docdesk_view::normalize;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the list command.
#[derive(Args)]
pub(crate) struct ListArgs {
    /// Version identifier.
    version: String,

    /// Document storage root (overrides config).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover docdesk.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ListArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            storage_root: self.root.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let version = normalize(&self.version);
        let store = FsStore::new(config.storage_resolved.root.clone());
        let docs = store.scan(version)?;

        output.info(&format!("{} documents in {version}:", docs.len()));
        for entry in &docs {
            output.info(&format!("  {:<32} {}", entry.doc, entry.title));
        }
        Ok(())
    }
}
