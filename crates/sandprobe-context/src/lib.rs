//! # sandprobe-context
//!
//! Builds the content of one isolated probe context from three independently
//! typed fragments:
//!
//! 1. [`fragment::PolicyFragment`]: the target's directive, re-declared
//!    verbatim. Present iff a directive was extracted.
//! 2. [`fragment::HardeningFragment`]: neutralizes network, beacon, dialog
//!    and form-submission entry points. Present iff a directive was extracted.
//! 3. [`fragment::PayloadFragment`]: the probe script, run on load.
//!
//! [`builder::ContextBuilder`] composes them with a single serializer and
//! issues each context a fresh identity.

pub mod builder;
pub mod fragment;

pub use builder::{ContextBuilder, ContextContent};
pub use fragment::{Fragment, HardeningFragment, PayloadFragment, PolicyFragment};

// ── Tests ─────────────────────────────────────────────────────────────────────
