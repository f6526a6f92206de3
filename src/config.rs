//! Engine configuration.
//!
//! Configuration is plain serde data, usually read from a JSON file. Every
//! field has a default, so `{}` is a complete configuration.
//!
//! ```rust
//! use yang_path::config::EngineConfig;
//! use yang_path::validation::ValidationOption;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::from_json_str(r#"{
//!     "repository": { "search_dir": "models" },
//!     "validation": { "option": "get-config" }
//! }"#)?;
//! assert_eq!(config.validation.option, ValidationOption::GetConfig);
//! assert!(config.validation.check_structure);
//! assert!(config.repository.use_model_providers);
//! # Ok(())
//! # }
//! ```

use crate::error::YangResult;
use crate::validation::ValidationOption;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub repository: RepositoryConfig,
    pub validation: ValidationConfig,
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> YangResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> YangResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Where module definitions are looked up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    /// Directory of `*.json` module definitions
    pub search_dir: Option<PathBuf>,
    /// Ask registered model providers for modules not found locally
    pub use_model_providers: bool,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            search_dir: None,
            use_model_providers: true,
        }
    }
}

/// Defaults for validation passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub option: ValidationOption,
    /// Check instance counts, duplicates, keys and mandatory leaves
    pub check_structure: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            option: ValidationOption::default(),
            check_structure: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = EngineConfig::from_json_str("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.validation.option, ValidationOption::Datastore);
    }

    #[test]
    fn test_invalid_config() {
        assert!(EngineConfig::from_json_str(r#"{"validation": {"option": "bogus"}}"#).is_err());
        assert!(EngineConfig::from_file("/nonexistent/config.json").is_err());
    }
}
