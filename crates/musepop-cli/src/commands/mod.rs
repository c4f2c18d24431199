//! CLI subcommands and the context they share.

pub mod config;
pub mod features;
pub mod ingest;
pub mod museums;
pub mod parse;
pub mod predict;
pub mod run;
pub mod train;

use std::path::{Path, PathBuf};

use tracing::debug;

use musepop_core::models::config::MusepopConfig;
use musepop_core::source::{HttpClient, HttpSource, OfflineSource};
use musepop_core::JsonStore;

/// Options shared by every data command.
pub struct GlobalOptions<'a> {
    pub config: Option<&'a Path>,
    pub data_dir: Option<&'a Path>,
    pub offline: bool,
}

/// Configuration and handles resolved from the global options.
pub struct Context {
    pub config: MusepopConfig,
    pub offline: bool,
}

impl Context {
    /// Load the configuration: explicit file, else the user config file,
    /// else defaults; then environment overrides and `--data-dir`.
    pub fn load(options: &GlobalOptions<'_>) -> anyhow::Result<Self> {
        let config = match options.config {
            Some(path) => MusepopConfig::from_file(path)?,
            None => {
                let user_path = config::default_config_path();
                if user_path.exists() {
                    MusepopConfig::from_file(&user_path)?
                } else {
                    MusepopConfig::default()
                }
            }
        };

        let mut config = config.with_env_overrides()?;
        if let Some(dir) = options.data_dir {
            config.storage.data_dir = dir.to_path_buf();
        }
        debug!("Data directory: {}", config.storage.data_dir.display());

        Ok(Self {
            config,
            offline: options.offline,
        })
    }

    pub fn store(&self) -> JsonStore {
        JsonStore::new(self.tables_dir())
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.config.storage.tables_dir()
    }

    /// Live HTTP client, or a source that refuses every request when offline.
    pub fn http(&self) -> anyhow::Result<Box<dyn HttpSource>> {
        if self.offline {
            return Ok(Box::new(OfflineSource));
        }
        Ok(Box::new(HttpClient::new(&self.config.sources.user_agent)?))
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text table
    Text,
}
