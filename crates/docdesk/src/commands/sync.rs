//! `docdesk sync` command implementation.

use std::path::PathBuf;

use clap::Args;
use docdesk_config::{CliSettings, Config};
use docdesk_sync::Syncer;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    /// Document storage root (overrides config).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Fetch timeout in seconds (overrides config).
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum parallel version syncs (overrides config).
    #[arg(long)]
    max_parallel: Option<usize>,

    /// Path to configuration file (default: auto-discover docdesk.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SyncArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            storage_root: self.root.clone(),
            timeout_secs: self.timeout,
            max_parallel: self.max_parallel,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Storage: {}",
            config.storage_resolved.root.display()
        ));
        output.info(&format!("Syncing {} versions...", config.versions.len()));

        let syncer = Syncer::new(
            config.versions.clone(),
            config.storage_resolved.root.clone(),
            &config.sync,
        );
        let report = syncer.sync();

        for outcome in &report.outcomes {
            match &outcome.result {
                Ok(()) => output.success(&format!("  {}: synced", outcome.version)),
                Err(e) => output.error(&format!("  {}: {e}", outcome.version)),
            }
        }

        if report.is_success() {
            output.success(&format!("Synced {} versions", report.synced()));
            Ok(())
        } else {
            Err(CliError::Sync(format!(
                "{} of {} versions failed to sync",
                report.outcomes.len() - report.synced(),
                report.outcomes.len()
            )))
        }
    }
}
