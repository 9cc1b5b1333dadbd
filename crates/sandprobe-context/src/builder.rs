//! Context composition.
//!
//! `ContextBuilder` is created once per run from the target and its extracted
//! policy. For every probe it produces a `ContextContent` (the three optional
//! fragments) and, from that, a fully serialized `ExecutionContext` with a
//! freshly issued identity.

use tracing::trace;

use sandprobe_contracts::{
    context::{ContextId, ExecutionContext},
    probe::ProbeDefinition,
    target::{ExtractedPolicy, TargetDescriptor},
};

use crate::fragment::{Fragment, HardeningFragment, PayloadFragment, PolicyFragment};

/// The ordered fragments of one probe context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextContent {
    pub policy: Option<PolicyFragment>,
    pub hardening: Option<HardeningFragment>,
    pub payload: PayloadFragment,
}

impl ContextContent {
    /// Concatenate the present fragments: policy, hardening, payload.
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        if let Some(policy) = &self.policy {
            policy.render(&mut out);
        }
        if let Some(hardening) = &self.hardening {
            hardening.render(&mut out);
        }
        self.payload.render(&mut out);
        out
    }
}

/// Builds probe contexts for one target.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    isolation_attributes: String,
    capability_allowances: String,
    directive: Option<String>,
    hardening: bool,
}

impl ContextBuilder {
    /// Hardening is switched on exactly when `policy` carries a directive.
    pub fn new(target: &TargetDescriptor, policy: &ExtractedPolicy) -> Self {
        Self {
            isolation_attributes: target.isolation_attributes.clone(),
            capability_allowances: target.capability_allowances.clone(),
            directive: policy.directive.clone(),
            hardening: policy.hardening_enabled(),
        }
    }

    pub fn hardening_enabled(&self) -> bool {
        self.hardening
    }

    /// Assemble the fragments for `payload` without serializing them.
    pub fn content(&self, payload: &str) -> ContextContent {
        ContextContent {
            policy: PolicyFragment::for_directive(self.directive.as_deref()),
            hardening: HardeningFragment::when(self.hardening),
            payload: PayloadFragment::new(payload),
        }
    }

    /// Build a ready-to-attach context for `probe` under a new identity.
    pub fn build(&self, probe: &ProbeDefinition) -> ExecutionContext {
        let id = ContextId::new();
        let content = self.content(&probe.payload).serialize();

        trace!(
            context_id = %id,
            probe = %probe.name,
            content_len = content.len(),
            "context built"
        );

        ExecutionContext {
            id,
            probe: probe.name.clone(),
            isolation_attributes: self.isolation_attributes.clone(),
            capability_allowances: self.capability_allowances.clone(),
            content,
        }
    }
}
