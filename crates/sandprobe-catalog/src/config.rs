//! Run configuration.
//!
//! A `RunConfig` bundles the target under test with the suite options, so a
//! whole run can be described by one TOML file:
//!
//! ```toml
//! timeout_millis = 8000
//!
//! [target]
//! isolation_attributes = "allow-scripts"
//! capability_allowances = "camera 'none'"
//! restriction_policy_text = '<meta http-equiv="Content-Security-Policy" content="default-src none">'
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use sandprobe_contracts::{
    config::{SuiteConfig, DEFAULT_TIMEOUT_MILLIS},
    error::{SandprobeError, SandprobeResult},
    target::TargetDescriptor,
};

/// A target plus the options to probe it with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_timeout_millis")]
    pub timeout_millis: u64,
    #[serde(default)]
    pub target: TargetDescriptor,
}

fn default_timeout_millis() -> u64 {
    DEFAULT_TIMEOUT_MILLIS
}

impl RunConfig {
    pub fn new(target: TargetDescriptor) -> Self {
        Self {
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
            target,
        }
    }

    /// Parse `s` as a TOML run configuration.
    ///
    /// Returns `SandprobeError::ConfigError` if the TOML is malformed or the
    /// timeout is zero.
    pub fn from_toml_str(s: &str) -> SandprobeResult<Self> {
        let config: RunConfig = toml::from_str(s).map_err(|e| SandprobeError::ConfigError {
            reason: format!("failed to parse run config TOML: {}", e),
        })?;
        if config.timeout_millis == 0 {
            return Err(SandprobeError::ConfigError {
                reason: "timeout_millis must be greater than zero".to_string(),
            });
        }
        Ok(config)
    }

    /// Read the file at `path` and parse it as a TOML run configuration.
    pub fn from_file(path: &Path) -> SandprobeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SandprobeError::ConfigError {
            reason: format!("failed to read run config '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn suite_config(&self) -> SuiteConfig {
        SuiteConfig::with_timeout_millis(self.timeout_millis)
    }
}
