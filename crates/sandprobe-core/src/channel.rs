//! The single inbound message channel shared by every probe of a run.

use tokio::sync::mpsc;

use sandprobe_contracts::verdict::InboundMessage;

/// Held by the host; used to deliver messages posted by attached contexts.
pub type InboundSender = mpsc::UnboundedSender<InboundMessage>;

/// Held by the suite runner and lent to one live executor at a time.
pub type InboundReceiver = mpsc::UnboundedReceiver<InboundMessage>;

/// Create the inbound channel for one suite runner.
pub fn inbound_channel() -> (InboundSender, InboundReceiver) {
    mpsc::unbounded_channel()
}
