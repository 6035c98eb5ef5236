//! Query limits.

use crate::error::{RasscopeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Limits applied to structure, extraction and preview queries.
///
/// Every field is optional in a TOML file; missing fields keep their default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    /// Deepest level the tree explorer expands (root is level 0).
    pub max_depth: usize,
    /// Sample size for array previews.
    pub max_samples: usize,
    /// Row limit for table previews.
    pub max_rows: usize,
    /// Number of largest datasets listed in an analysis report.
    pub top_datasets: usize,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_samples: 10,
            max_rows: 1000,
            top_datasets: 10,
        }
    }
}

impl ScopeConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RasscopeError::file_open(path.to_path_buf(), e))?;
        Self::from_toml(&text)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
