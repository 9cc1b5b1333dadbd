//! Probe catalogs.
//!
//! A catalog is an ordered list of `ProbeDefinition`s read from TOML:
//!
//! ```toml
//! [[probes]]
//! name = "Cookie read"
//! description = "document.cookie must be empty or unavailable"
//! payload = '''
//! parent.postMessage({ type: 'test-result', blocked: true }, '*');
//! '''
//! ```
//!
//! Declaration order is execution order. The harness knows nothing about
//! individual probes, so swapping catalogs needs no code changes.

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sandprobe_contracts::{
    error::{SandprobeError, SandprobeResult},
    probe::ProbeDefinition,
};

/// The default battery, compiled into the binary.
const BUNDLED_CATALOG: &str = include_str!("../catalogs/default.toml");

/// An ordered, validated list of probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeCatalog {
    #[serde(default)]
    pub probes: Vec<ProbeDefinition>,
}

impl ProbeCatalog {
    /// Parse `s` as a TOML catalog and validate it.
    ///
    /// Returns `SandprobeError::CatalogError` if the TOML is malformed, the
    /// catalog is empty, or a probe has a blank name or payload.
    pub fn from_toml_str(s: &str) -> SandprobeResult<Self> {
        let catalog: ProbeCatalog = toml::from_str(s).map_err(|e| SandprobeError::CatalogError {
            reason: format!("failed to parse catalog TOML: {}", e),
        })?;
        catalog.validate()?;
        debug!(probes = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Read the file at `path` and parse it as a TOML catalog.
    pub fn from_file(path: &Path) -> SandprobeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SandprobeError::CatalogError {
            reason: format!("failed to read catalog file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The bundled default battery.
    pub fn bundled() -> SandprobeResult<Self> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.probes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Look a probe up by its exact name.
    pub fn find(&self, name: &str) -> Option<&ProbeDefinition> {
        self.probes.iter().find(|p| p.name == name)
    }

    fn validate(&self) -> SandprobeResult<()> {
        if self.probes.is_empty() {
            return Err(SandprobeError::CatalogError {
                reason: "catalog contains no probes".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for (index, probe) in self.probes.iter().enumerate() {
            if probe.name.trim().is_empty() {
                return Err(SandprobeError::CatalogError {
                    reason: format!("probe #{} has an empty name", index),
                });
            }
            if probe.payload.trim().is_empty() {
                return Err(SandprobeError::CatalogError {
                    reason: format!("probe '{}' has an empty payload", probe.name),
                });
            }
            // Names key response scripts, so a duplicate only shadows.
            if !seen.insert(probe.name.as_str()) {
                warn!(probe = %probe.name, "duplicate probe name in catalog");
            }
        }
        Ok(())
    }
}
