//! # sandprobe-catalog
//!
//! File-backed inputs for the sandprobe harness: probe catalogs and run
//! configurations, both read from TOML.
//!
//! ```rust,ignore
//! use sandprobe_catalog::{ProbeCatalog, RunConfig};
//!
//! let catalog = ProbeCatalog::bundled()?;
//! let config = RunConfig::from_file(Path::new("target.toml"))?;
//! let result = runner.run(&config.target, &catalog.probes, config.suite_config()).await;
//! ```

pub mod catalog;
pub mod config;

pub use catalog::ProbeCatalog;
pub use config::RunConfig;

// ── Tests ─────────────────────────────────────────────────────────────────────
