use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_DATA_DIR_PREFIX;
use crate::Error;
use crate::Result;

/// Where generated instances keep their data
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Parent directory of generated data directories
    ///
    /// Default: `None` (the system temp directory)
    #[serde(default)]
    pub temp_root: Option<PathBuf>,

    /// Name prefix of every generated data directory
    ///
    /// Default: `default_dir_prefix()` ("ensemble-")
    #[serde(default = "default_dir_prefix")]
    pub dir_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_root: None,
            dir_prefix: default_dir_prefix(),
        }
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dir_prefix.is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "dir_prefix cannot be empty".into(),
            )));
        }

        if let Some(root) = &self.temp_root {
            if root.as_os_str().is_empty() {
                return Err(Error::Config(ConfigError::Message(
                    "temp_root path cannot be empty".into(),
                )));
            }
        }

        Ok(())
    }
}

fn default_dir_prefix() -> String {
    DEFAULT_DATA_DIR_PREFIX.to_string()
}
