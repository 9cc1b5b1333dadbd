//! Schema-based verdict parser.
//!
//! `SchemaVerdictParser` implements the `VerdictParser` trait from
//! `sandprobe-core`. Parsing runs in two phases:
//!
//! 1. **Structural**: the posted value is validated against the verdict
//!    JSON Schema using the `jsonschema` crate. Anything that fails is
//!    dropped.
//! 2. **Extraction**: the validated value is deserialized into a `Verdict`.
//!
//! The schema is compiled once, at construction.

use serde_json::{json, Value};
use tracing::debug;

use sandprobe_contracts::{
    error::{SandprobeError, SandprobeResult},
    verdict::{Verdict, VERDICT_TAG},
};
use sandprobe_core::traits::VerdictParser;

/// The JSON Schema every probe's verdict message must satisfy.
///
/// `type` must equal the verdict tag, `blocked` must be a boolean, and
/// `detail`, when present, must be a string (or null). Extra fields are
/// allowed and ignored.
pub fn verdict_schema() -> Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "title": "sandprobe verdict message",
        "type": "object",
        "properties": {
            "type": { "const": VERDICT_TAG },
            "blocked": { "type": "boolean" },
            "detail": { "type": ["string", "null"] }
        },
        "required": ["type", "blocked"]
    })
}

/// Verdict parser backed by a compiled JSON Schema.
pub struct SchemaVerdictParser {
    validator: jsonschema::Validator,
}

impl SchemaVerdictParser {
    /// Compile the standard verdict schema.
    pub fn new() -> SandprobeResult<Self> {
        Self::from_schema(&verdict_schema())
    }

    /// Compile a caller-supplied schema.
    ///
    /// The schema may tighten the contract but must still describe values
    /// that deserialize into a `Verdict`; values that validate but do not
    /// deserialize are dropped.
    ///
    /// Returns `SandprobeError::SchemaError` if the schema does not compile.
    pub fn from_schema(schema: &Value) -> SandprobeResult<Self> {
        let validator = jsonschema::validator_for(schema).map_err(|e| SandprobeError::SchemaError {
            reason: format!("invalid verdict schema: {e}"),
        })?;
        Ok(Self { validator })
    }
}

impl VerdictParser for SchemaVerdictParser {
    fn parse(&self, data: &Value) -> Option<Verdict> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(data)
            .map(|error| format!("{}: {}", error.instance_path, error))
            .collect();

        if !violations.is_empty() {
            debug!(violations = %violations.join("; "), "verdict shape check failed");
            return None;
        }

        match serde_json::from_value::<Verdict>(data.clone()) {
            Ok(verdict) => Some(verdict),
            Err(e) => {
                debug!(error = %e, "verdict passed schema but did not deserialize");
                None
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
