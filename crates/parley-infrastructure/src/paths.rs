//! Unified path management for Parley files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/parley/            # Config directory (platform config dir)
//! ├── config.toml              # Application configuration
//! └── conversation.toml        # Persisted conversation snapshot
//! ```

use parley_core::ParleyError;
use std::path::PathBuf;
use thiserror::Error;

const APP_DIR: &str = "parley";

/// Errors that can occur during path resolution.
#[derive(Debug, Error)]
pub enum PathError {
    /// The platform config directory could not be determined.
    #[error("Cannot find config directory")]
    ConfigDirNotFound,
}

impl From<PathError> for ParleyError {
    fn from(err: PathError) -> Self {
        ParleyError::config(err.to_string())
    }
}

/// Resolves every path Parley reads or writes.
pub struct ParleyPaths;

impl ParleyPaths {
    /// Returns the Parley configuration directory (e.g. `~/.config/parley/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default conversation snapshot path.
    pub fn conversation_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("conversation.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_under_config_dir() {
        let Ok(config_dir) = ParleyPaths::config_dir() else {
            return;
        };
        assert!(config_dir.ends_with("parley"));

        let config_file = ParleyPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        assert!(config_file.starts_with(&config_dir));

        let conversation = ParleyPaths::conversation_file().unwrap();
        assert!(conversation.ends_with("conversation.toml"));
        assert!(conversation.starts_with(&config_dir));
    }
}
