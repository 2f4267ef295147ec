//! Configuration loading and management
//!
//! Defaults can be overridden by an optional TOML config file, which in
//! turn is overridden by CLI flags (each with a `TD_*` environment
//! fallback, wired up in the CLI layer).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the task data file
    #[serde(default = "default_file")]
    pub file: PathBuf,

    /// Maximum number of tasks the store will hold
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,

    /// Maximum title length in characters
    #[serde(default = "default_max_title_length")]
    pub max_title_length: usize,

    /// Maximum description length in characters
    #[serde(default = "default_max_description_length")]
    pub max_description_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: default_file(),
            max_tasks: default_max_tasks(),
            max_title_length: default_max_title_length(),
            max_description_length: default_max_description_length(),
        }
    }
}

fn default_file() -> PathBuf {
    PathBuf::from("todos.json")
}

fn default_max_tasks() -> usize {
    1000
}

fn default_max_title_length() -> usize {
    200
}

fn default_max_description_length() -> usize {
    1000
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional file path, falling back to
    /// defaults when the path is absent or unreadable
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::load(path).unwrap_or_else(|err| {
                tracing::warn!("ignoring config file {}: {err}", path.display());
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|err| Error::InvalidConfig(err.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.max_tasks == 0 {
            return Err(Error::InvalidConfig(
                "max_tasks must be at least 1".to_string(),
            ));
        }
        if self.max_title_length == 0 {
            return Err(Error::InvalidConfig(
                "max_title_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.file, PathBuf::from("todos.json"));
        assert_eq!(config.max_tasks, 1000);
        assert_eq!(config.max_title_length, 200);
        assert_eq!(config.max_description_length, 1000);
    }

    #[test]
    fn load_reads_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("td.toml");
        fs::write(
            &path,
            "file = \"tasks/my.json\"\nmax_tasks = 5\nmax_title_length = 40\n",
        )
        .expect("write config");

        let config = Config::load(&path).expect("load");
        assert_eq!(config.file, PathBuf::from("tasks/my.json"));
        assert_eq!(config.max_tasks, 5);
        assert_eq!(config.max_title_length, 40);
        // Unset keys keep their defaults
        assert_eq!(config.max_description_length, 1000);
    }

    #[test]
    fn load_rejects_zero_capacity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("td.toml");
        fs::write(&path, "max_tasks = 0").expect("write config");

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.toml");
        let config = Config::load_or_default(Some(&path));
        assert_eq!(config.max_tasks, 1000);
    }

    #[test]
    fn save_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("td.toml");

        let mut config = Config::default();
        config.max_tasks = 7;
        config.save(&path).expect("save");

        let loaded = Config::load(&path).expect("load");
        assert_eq!(loaded.max_tasks, 7);
    }
}
