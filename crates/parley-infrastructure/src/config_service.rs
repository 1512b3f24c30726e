//! Configuration service implementation.
//!
//! Loads `ParleyConfig` from `~/.config/parley/config.toml` (or an explicit
//! path) and caches it.

use crate::paths::ParleyPaths;
use parley_core::config::ParleyConfig;
use parley_core::error::{ParleyError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Configuration service that loads and caches the configuration.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    config: Arc<RwLock<Option<ParleyConfig>>>,
}

impl ConfigService {
    /// Creates a service reading the default config file.
    pub fn new() -> Self {
        Self {
            path: None,
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a service reading `path` instead of the default file.
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the configuration, loading it on first access.
    ///
    /// A missing file yields defaults; an unreadable one is logged and also
    /// yields defaults.
    pub fn get_config(&self) -> ParleyConfig {
        if let Some(config) = self.config.read().ok().and_then(|cached| cached.clone()) {
            return config;
        }

        let loaded = self.resolve_path().and_then(|path| Self::load_from(&path));
        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("[ConfigService] Using default configuration: {}", e);
                ParleyConfig::default()
            }
        };

        if let Ok(mut cache) = self.config.write() {
            *cache = Some(config.clone());
        }
        config
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        if let Ok(mut cache) = self.config.write() {
            *cache = None;
        }
    }

    /// Parses the config file at `path`; a missing or blank file is the
    /// default configuration.
    pub fn load_from(path: &Path) -> Result<ParleyConfig> {
        if !path.exists() {
            tracing::debug!("[ConfigService] No config file at {:?}", path);
            return Ok(ParleyConfig::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(ParleyConfig::default());
        }

        toml::from_str(&content).map_err(|e| {
            ParleyError::config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn resolve_path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Ok(ParleyPaths::config_file()?),
        }
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}
