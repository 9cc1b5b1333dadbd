//! The verdict message contract.
//!
//! Every probe reports back by posting a structured message to its enclosing
//! context:
//!
//! ```json
//! { "type": "test-result", "blocked": true, "detail": "SecurityError: ..." }
//! ```
//!
//! `blocked` is required and boolean; `detail` is optional free text. Anything
//! else arriving on the inbound channel is ignored.

use serde::{Deserialize, Serialize};

use crate::context::ContextId;

/// Value of the `type` field that marks a message as a verdict.
pub const VERDICT_TAG: &str = "test-result";

/// Detail recorded when a probe never answers within its window.
pub const TIMEOUT_DETAIL: &str = "no response (timeout, assumed blocked)";

/// One event delivered on the shared inbound channel.
///
/// `source` is the identity of the context that posted the message, as seen
/// by the host. `data` is the raw posted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub source: ContextId,
    pub data: serde_json::Value,
}

impl InboundMessage {
    pub fn new(source: ContextId, data: serde_json::Value) -> Self {
        Self { source, data }
    }
}

/// A message that passed the verdict shape check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// True when the probed capability was blocked.
    pub blocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Verdict {
    /// Build the JSON body a well-behaved probe would post for this verdict.
    pub fn to_message(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "type": VERDICT_TAG,
            "blocked": self.blocked,
        });
        if let Some(detail) = &self.detail {
            body["detail"] = serde_json::Value::String(detail.clone());
        }
        body
    }
}
