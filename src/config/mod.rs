//! Configuration management for the test ensemble.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Environment variable overrides
//! - Configuration file support
//! - Component-wise validation
mod ports;
mod storage;
mod timing;
pub use ports::*;
pub use storage::*;
pub use timing::*;


use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CONFIG_ENV_PREFIX;
use crate::constants::CONFIG_PATH_ENV;
use crate::Result;

/// Main configuration container for the ensemble harness
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `ENSEMBLE_CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct EnsembleConfig {
    /// Timing constants handed to every node
    #[serde(default)]
    pub timing: TimingConfig,
    /// Random port allocation for generated instances
    #[serde(default)]
    pub ports: PortConfig,
    /// Temporary storage for generated instances
    #[serde(default)]
    pub storage: StorageConfig,
}

impl EnsembleConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `ENSEMBLE_CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `ENSEMBLE__` prefix (highest priority)
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("ENSEMBLE__TIMING__TICK_TIME_MS", "500");
    /// let cfg = EnsembleConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates all subsystems and returns the validated instance.
    pub fn validate(self) -> Result<Self> {
        self.timing.validate()?;
        self.ports.validate()?;
        self.storage.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(CONFIG_ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
