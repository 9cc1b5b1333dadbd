//! Isolated execution context identity and description.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identity issued to each constructed context.
///
/// Inbound messages are attributed to a context by this value alone, so a
/// fresh one is issued for every probe and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContextId(pub uuid::Uuid);

impl ContextId {
    /// Issue a new, unique context identity.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for ContextId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One isolated context, ready to be attached to the host document.
///
/// Owned by a single probe executor from construction until release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Identity checked against every inbound message.
    pub id: ContextId,
    /// Name of the probe this context carries. Diagnostic only.
    pub probe: String,
    /// Isolation attributes copied from the target.
    pub isolation_attributes: String,
    /// Capability allowances copied from the target.
    pub capability_allowances: String,
    /// Serialized document content (policy, hardening, payload).
    pub content: String,
}
