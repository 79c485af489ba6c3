//! Configuration service implementation.
//!
//! Loads the root configuration from `config.toml`, creating the file with
//! defaults on first use.

use crate::paths::ChatfillPaths;
use crate::storage::AtomicTomlFile;
use chatfill_core::config::RootConfig;
use chatfill_core::error::{ChatfillError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the root configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading the platform default `config.toml`.
    pub fn default_location() -> Result<Self> {
        let path =
            ChatfillPaths::config_file().map_err(|e| ChatfillError::config(e.to_string()))?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// A missing or empty file is created with the default configuration.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let cached = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(config) = cached.as_ref() {
                return Ok(config.clone());
            }
        }

        let loaded = AtomicTomlFile::<RootConfig>::new(self.path.clone())
            .load_or_create(RootConfig::default())?;
        tracing::debug!(
            "[ConfigService] Loaded configuration from {}",
            self.path.display()
        );

        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        let mut cache = self.config.write().unwrap_or_else(|e| e.into_inner());
        *cache = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_creates_default_file_when_missing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let service = ConfigService::new(&path);

        let config = service.get_config().unwrap();

        assert_eq!(config, RootConfig::default());
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("target_positions"));
    }

    #[test]
    fn test_reads_positions_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[duplication]\ntarget_positions = [0, 2]\n").unwrap();
        let service = ConfigService::new(&path);

        assert_eq!(
            service.get_config().unwrap().duplication.target_positions.as_slice(),
            &[0, 2]
        );

        fs::write(&path, "[duplication]\ntarget_positions = [5]\n").unwrap();
        // Still served from cache
        assert_eq!(
            service.get_config().unwrap().duplication.target_positions.as_slice(),
            &[0, 2]
        );

        service.invalidate_cache();
        assert_eq!(
            service.get_config().unwrap().duplication.target_positions.as_slice(),
            &[5]
        );
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[duplication]\ntarget_positions = [-1]\n").unwrap();

        let err = ConfigService::new(&path).get_config().unwrap_err();
        assert!(err.is_serialization());
    }
}
