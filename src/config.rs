//! Grid configuration loaded from JSON or built in code.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading and validation failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for [`GridConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The values are inconsistent.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Per-grid tunables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Initial rows per page.
    pub page_size: usize,
    /// Upper bound applied by `set_page_size`.
    pub max_page_size: usize,
    /// Choices offered by the page-size picker.
    pub page_size_options: Vec<usize>,
    /// Open freshly added records in edit mode.
    pub open_new_records_in_edit: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            max_page_size: 20,
            page_size_options: vec![5, 10, 15, 20],
            open_new_records_in_edit: true,
        }
    }
}

impl GridConfig {
    /// Parses and validates a JSON document; missing keys take defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses, and validates a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks page-size bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size == 0 {
            return Err(ConfigError::Invalid("max_page_size must be at least 1".into()));
        }
        if self.page_size == 0 || self.page_size > self.max_page_size {
            return Err(ConfigError::Invalid(format!(
                "page_size {} outside 1..={}",
                self.page_size, self.max_page_size
            )));
        }
        if let Some(bad) = self
            .page_size_options
            .iter()
            .find(|n| **n == 0 || **n > self.max_page_size)
        {
            return Err(ConfigError::Invalid(format!(
                "page size option {bad} outside 1..={}",
                self.max_page_size
            )));
        }
        Ok(())
    }
}
