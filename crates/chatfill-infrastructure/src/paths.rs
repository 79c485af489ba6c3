//! Path resolution for chatfill configuration and session data.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/chatfill/          # Config directory
//! └── config.toml              # Application configuration
//!
//! ~/.local/share/chatfill/     # Data directory
//! └── sessions/
//!     ├── character-<id>/
//!     │   └── <session-id>.toml
//!     └── group-<id>/
//!         └── <session-id>.toml
//! ```

use std::path::PathBuf;
use thiserror::Error;

const APP_DIR_NAME: &str = "chatfill";

/// Errors that can occur during path resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Cannot determine the platform {0} directory")]
    DirNotFound(&'static str),
}

/// Resolves the platform directories used by chatfill.
pub struct ChatfillPaths;

impl ChatfillPaths {
    /// Returns the configuration directory (e.g. `~/.config/chatfill/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::DirNotFound("config"))
    }

    /// Returns the data directory (e.g. `~/.local/share/chatfill/`).
    pub fn data_dir() -> Result<PathBuf, PathError> {
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or(PathError::DirNotFound("data"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default directory holding session files.
    pub fn sessions_dir() -> Result<PathBuf, PathError> {
        Ok(Self::data_dir()?.join("sessions"))
    }
}
