//! Error types for the ambient parts of the harness.
//!
//! A suite run itself never fails: timeouts, malformed verdicts and missing
//! policies are all outcomes, not errors. `SandprobeError` covers loading
//! catalogs and configuration and preparing the verdict validator.

use thiserror::Error;

/// The unified error type for sandprobe crates.
#[derive(Debug, Error)]
pub enum SandprobeError {
    /// A run configuration or response script is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// A probe catalog could not be loaded or is structurally invalid.
    #[error("catalog error: {reason}")]
    CatalogError { reason: String },

    /// The verdict JSON Schema could not be compiled.
    #[error("schema error: {reason}")]
    SchemaError { reason: String },
}

/// Convenience alias used throughout the sandprobe crates.
pub type SandprobeResult<T> = Result<T, SandprobeError>;
