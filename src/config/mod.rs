#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

pub use toml_config::SuiteConfig;

use crate::utils::error::Result;
use std::path::Path;

/// Environment variable naming a config file when none is passed explicitly.
pub const CONFIG_ENV_VAR: &str = "LAMBDATEST_CONFIG";

/// Loads the suite configuration: explicit path, then `LAMBDATEST_CONFIG`, then defaults.
pub fn load_config(path: Option<&Path>) -> Result<SuiteConfig> {
    if let Some(path) = path {
        tracing::debug!("Loading config from {}", path.display());
        return SuiteConfig::from_file(path);
    }

    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => {
            tracing::debug!("Loading config from {}={}", CONFIG_ENV_VAR, path);
            SuiteConfig::from_file(path)
        }
        _ => Ok(SuiteConfig::default()),
    }
}
