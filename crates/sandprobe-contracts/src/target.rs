//! The target under test and the policy derived from it.

use serde::{Deserialize, Serialize};

/// Everything the harness reads from the isolated context being verified.
///
/// Supplied by the caller and never mutated. The attribute strings are
/// carried to every probe context unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDescriptor {
    /// Isolation attribute tokens (e.g. "allow-scripts").
    #[serde(default)]
    pub isolation_attributes: String,
    /// Capability allowance list (e.g. "camera 'none'; geolocation 'none'").
    #[serde(default)]
    pub capability_allowances: String,
    /// The target's own document text, which may declare a restriction policy.
    #[serde(default)]
    pub restriction_policy_text: Option<String>,
}

impl TargetDescriptor {
    pub fn new(
        isolation_attributes: impl Into<String>,
        capability_allowances: impl Into<String>,
        restriction_policy_text: Option<String>,
    ) -> Self {
        Self {
            isolation_attributes: isolation_attributes.into(),
            capability_allowances: capability_allowances.into(),
            restriction_policy_text,
        }
    }
}

/// The restriction directive extracted once per run.
///
/// `directive` is `None` exactly when no recognizable default-source
/// directive was found in the target's policy text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedPolicy {
    pub directive: Option<String>,
}

impl ExtractedPolicy {
    pub fn none() -> Self {
        Self { directive: None }
    }

    pub fn from_directive(directive: impl Into<String>) -> Self {
        Self {
            directive: Some(directive.into()),
        }
    }

    /// Harness-side hardening is layered on only when the target declared a
    /// restrictive policy of its own.
    pub fn hardening_enabled(&self) -> bool {
        self.directive.is_some()
    }
}
