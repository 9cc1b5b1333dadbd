//! # sandprobe-ref-host
//!
//! Reference host for the sandprobe harness.
//!
//! A real deployment embeds the harness in a document that can attach
//! isolated sub-contexts. This crate provides an in-process stand-in,
//! [`host::ScriptedHost`], whose probes "reply" according to a
//! [`script::ResponseScript`], plus three reference scenarios:
//!
//! 1. **Isolation only**: no declared policy, a silent probe settles as
//!    blocked on timeout.
//! 2. **Declared policy**: the target's directive is carried into the context
//!    together with the hardening fragment; a probe that reports it was not
//!    blocked fails.
//! 3. **Bundled battery**: the full default catalog against a hardened target.
//!
//! Nothing here touches a real browser or the network.

pub mod host;
pub mod scenarios;
pub mod script;

pub use host::{HostEvent, HostLog, ScriptedHost};
pub use script::{Reply, ResponseScript};

// ── Tests ─────────────────────────────────────────────────────────────────────
