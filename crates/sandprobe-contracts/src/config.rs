//! Suite run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default per-probe verdict window.
pub const DEFAULT_TIMEOUT_MILLIS: u64 = 8000;

/// Options applied uniformly to every probe of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// How long each probe may stay silent before it is settled as blocked.
    #[serde(default = "default_timeout_millis")]
    pub timeout_millis: u64,
}

fn default_timeout_millis() -> u64 {
    DEFAULT_TIMEOUT_MILLIS
}

impl SuiteConfig {
    pub fn with_timeout_millis(timeout_millis: u64) -> Self {
        Self { timeout_millis }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            timeout_millis: DEFAULT_TIMEOUT_MILLIS,
        }
    }
}
