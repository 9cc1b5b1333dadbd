//! # sandprobe-verify
//!
//! Verdict-shape validation for the sandprobe harness.
//!
//! This crate provides [`parser::SchemaVerdictParser`], which implements the
//! [`sandprobe_core::traits::VerdictParser`] trait by validating inbound
//! messages against [`parser::verdict_schema`], the published verdict
//! contract.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use sandprobe_verify::SchemaVerdictParser;
//!
//! let parser = SchemaVerdictParser::new()?;
//! let runner = SuiteRunner::new(host, inbound, Box::new(parser));
//! ```

pub mod parser;

pub use parser::{verdict_schema, SchemaVerdictParser};
