//! Engine configuration
//!
//! Controls where table data lives and whether aggregate queries are
//! checked strictly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment variable overriding the data directory
pub const ENV_DATA_DIR: &str = "TABLEDB_DATA_DIR";
/// Environment variable enabling strict aggregate checking (`1`/`true`)
pub const ENV_STRICT_AGGREGATES: &str = "TABLEDB_STRICT_AGGREGATES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory holding one sub-directory per database
    pub data_dir: PathBuf,

    /// Reject aggregates without GROUP BY instead of emitting one
    /// aggregate value per row.
    ///
    /// Off by default: the per-row output is what existing callers get.
    pub strict_aggregates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            strict_aggregates: false,
        }
    }
}

impl Config {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn with_strict_aggregates(mut self, strict: bool) -> Self {
        self.strict_aggregates = strict;
        self
    }

    /// Loads configuration from a JSON file, missing fields take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Builds configuration from `TABLEDB_*` environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(flag) = std::env::var(ENV_STRICT_AGGREGATES) {
            config.strict_aggregates = matches!(flag.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use crate::error::Result;

    #[test]
    fn test_config_from_json() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("tabledb.json");
        std::fs::write(&path, r#"{ "strict_aggregates": true }"#)?;

        let config = Config::from_json_file(&path)?;
        assert!(config.strict_aggregates);
        assert_eq!(config.data_dir, Config::default().data_dir);

        let config = Config::new(dir.path()).with_strict_aggregates(false);
        assert_eq!(config.data_dir, dir.path());
        assert!(!config.strict_aggregates);
        Ok(())
    }
}
