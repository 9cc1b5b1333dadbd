//! Probe definitions.
//!
//! A probe is a self-contained script that asserts one security property of
//! an isolated context and reports a verdict. The harness never looks inside
//! `payload`; it only wraps it, delivers it, and waits for the verdict.

use serde::{Deserialize, Serialize};

/// One entry of a probe catalog.
///
/// Identity is the probe's position in its catalog, not its name. Two probes
/// may share a name; they are still distinct probes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeDefinition {
    /// Short human-readable name shown in reports.
    pub name: String,
    /// What the probe expects the isolated context to do.
    pub description: String,
    /// Script body executed inside the isolated context on load.
    pub payload: String,
}

impl ProbeDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            payload: payload.into(),
        }
    }
}
