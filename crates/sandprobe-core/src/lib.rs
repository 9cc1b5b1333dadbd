//! # sandprobe-core
//!
//! The orchestration engine of the sandprobe harness.
//!
//! This crate provides:
//! - The two environment traits (`ContextHost`, `VerdictParser`)
//! - The shared inbound message channel
//! - The `ProbeExecutor` state machine that settles one probe
//! - The `SuiteRunner` that drives a whole battery sequentially
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sandprobe_core::{inbound_channel, SuiteRunner};
//!
//! let (sender, inbound) = inbound_channel();
//! let mut runner = SuiteRunner::new(Box::new(MyHost::new(sender)), inbound, Box::new(parser));
//! let result = runner.run(&target, &catalog.probes, SuiteConfig::default()).await;
//! ```

pub mod channel;
pub mod executor;
pub mod suite;
pub mod traits;

pub use channel::{inbound_channel, InboundReceiver, InboundSender};
pub use executor::{ProbeExecutor, ProbeState, SettleFlag, Settlement};
pub use suite::{test_sandbox, SuiteRunner};
