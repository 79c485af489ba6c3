use anyhow::{Context as _, Result};
use chatfill_core::config::RootConfig;
use chatfill_infrastructure::{ChatfillPaths, ConfigService};
use std::path::PathBuf;

pub mod config;
pub mod duplicate;
pub mod list;

/// Command line overrides shared by all commands.
///
/// Nothing is read from or written to disk until a command asks for the
/// configuration or the sessions directory.
pub struct Context {
    pub config_service: ConfigService,
    sessions_dir: Option<PathBuf>,
}

impl Context {
    pub fn new(config_path: Option<PathBuf>, sessions_dir: Option<PathBuf>) -> Result<Self> {
        let config_service = match config_path {
            Some(path) => ConfigService::new(path),
            None => ConfigService::default_location()?,
        };
        Ok(Self {
            config_service,
            sessions_dir,
        })
    }

    /// Loads `config.toml`, creating it with defaults on first use.
    pub fn config(&self) -> Result<RootConfig> {
        self.config_service.get_config().with_context(|| {
            format!(
                "Failed to load configuration from {}",
                self.config_service.path().display()
            )
        })
    }

    /// Resolves the sessions directory.
    ///
    /// Precedence: command line, then `[storage] sessions_dir`, then the
    /// platform data directory. The configuration is only loaded when the
    /// command line gives no directory.
    pub fn sessions_dir(&self) -> Result<PathBuf> {
        let configured = match &self.sessions_dir {
            Some(dir) => Some(dir.clone()),
            None => self.config()?.storage.sessions_dir,
        };
        let dir = match configured {
            Some(dir) => dir,
            None => ChatfillPaths::sessions_dir()?,
        };
        tracing::debug!("[chatfill] Sessions directory: {}", dir.display());
        Ok(dir)
    }
}
