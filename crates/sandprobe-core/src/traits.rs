//! Trait seams between the harness and its environment.
//!
//! - `ContextHost`: the embedding document that probe contexts attach to
//! - `VerdictParser`: decides whether an inbound payload is a verdict
//!
//! The executor owns the ordering: build, listen, arm the timer, attach,
//! settle once, release. Implementations of these traits never see more than
//! one live context at a time.

use serde_json::Value;

use sandprobe_contracts::{
    context::{ContextId, ExecutionContext},
    verdict::Verdict,
};

/// The document that isolated contexts are attached to.
///
/// Messages posted by attached contexts are delivered separately, through the
/// `InboundSender` half of [`crate::channel::inbound_channel`], tagged with the
/// identity of the posting context.
pub trait ContextHost {
    /// Insert `context` into the document. Its payload starts running.
    fn attach(&mut self, context: &ExecutionContext);

    /// Remove and destroy the context with identity `id`.
    ///
    /// Called exactly once per attached context.
    fn detach(&mut self, id: &ContextId);
}

/// Recognizes the verdict message shape.
///
/// Implementations are trusted and must be pure: the same payload always
/// yields the same answer. Returning `None` drops the message.
pub trait VerdictParser: Send + Sync {
    /// Return the verdict carried by `data`, or `None` if `data` is not a
    /// well-formed verdict.
    fn parse(&self, data: &Value) -> Option<Verdict>;
}
