//! Inspection configuration
//!
//! Loaded from an `eqguard.yaml` file when one is present:
//!
//! ```yaml
//! # Also report bare `a.equals(b)` calls with no null check around them
//! ignore_null_check: true
//! ```

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up by [`InspectionConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "eqguard.yaml";

/// Inspection options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InspectionConfig {
    /// Report unguarded `a.equals(b)` calls too, not only the null-guarded
    /// forms
    #[serde(default = "default_true")]
    pub ignore_null_check: bool,
}

fn default_true() -> bool {
    true
}

impl Default for InspectionConfig {
    fn default() -> Self {
        Self {
            ignore_null_check: true,
        }
    }
}

impl InspectionConfig {
    /// Only the null-guarded forms are reported
    pub fn guarded_only() -> Self {
        Self {
            ignore_null_check: false,
        }
    }

    /// Parse from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means all defaults
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_norway::from_str(yaml).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load from an explicit file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_yaml(&content).map_err(|e| match e {
            Error::Config(msg) => {
                Error::Config(format!("Failed to parse {}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Load `eqguard.yaml` from `dir`, or the defaults if there is none
    pub fn discover(dir: &Path) -> Result<Self> {
        let config_file = dir.join(CONFIG_FILE_NAME);
        if !config_file.exists() {
            return Ok(Self::default());
        }
        tracing::debug!(path = %config_file.display(), "loading config");
        Self::load(&config_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reports_unguarded() {
        assert!(InspectionConfig::default().ignore_null_check);
        assert_eq!(
            InspectionConfig::from_yaml("").unwrap(),
            InspectionConfig::default()
        );
    }

    #[test]
    fn test_from_yaml() {
        let config = InspectionConfig::from_yaml("ignore_null_check: false\n").unwrap();
        assert_eq!(config, InspectionConfig::guarded_only());
    }

    #[test]
    fn test_unknown_key_is_ignored() {
        let config = InspectionConfig::from_yaml("something_else: 3\n").unwrap();
        assert!(config.ignore_null_check);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = InspectionConfig::from_yaml("ignore_null_check: [").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            InspectionConfig::discover(dir.path()).unwrap(),
            InspectionConfig::default()
        );

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "ignore_null_check: false\n").unwrap();
        assert!(!InspectionConfig::discover(dir.path()).unwrap().ignore_null_check);
    }
}
