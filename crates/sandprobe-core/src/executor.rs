//! The probe executor: one probe, one context, one outcome.
//!
//! Every probe moves through the same states:
//!
//!   Created → Pending → Settled{Blocked | Allowed} → Released
//!
//! Two external events race to settle a pending probe: the verdict window
//! elapsing, and a verdict arriving from the probe's own context. Whichever
//! comes first flips a single-use [`SettleFlag`]; the loser is ignored.
//! Silence is fail-closed: a probe that never answers is recorded as
//! blocked.
//!
//! The attached context is held by a [`LiveContext`] guard, so it is detached
//! exactly once whether the run settles normally or its future is dropped.

use std::time::Duration;

use tracing::{debug, trace, warn};

use sandprobe_contracts::{
    context::{ContextId, ExecutionContext},
    outcome::{ProbeOutcome, Resolution},
    probe::ProbeDefinition,
    verdict::{InboundMessage, Verdict, TIMEOUT_DETAIL},
};
use sandprobe_context::ContextBuilder;

use crate::{
    channel::InboundReceiver,
    traits::{ContextHost, VerdictParser},
};

// ── States ────────────────────────────────────────────────────────────────────

/// How a probe settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Blocked,
    Allowed,
}

impl Settlement {
    pub fn from_blocked(blocked: bool) -> Self {
        if blocked {
            Settlement::Blocked
        } else {
            Settlement::Allowed
        }
    }

    pub fn passed(self) -> bool {
        self == Settlement::Blocked
    }
}

/// Lifecycle of one probe execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Created,
    Pending,
    Settled(Settlement),
    Released,
}

impl ProbeState {
    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(self, next: ProbeState) -> bool {
        matches!(
            (self, next),
            (ProbeState::Created, ProbeState::Pending)
                | (ProbeState::Pending, ProbeState::Settled(_))
                | (ProbeState::Settled(_), ProbeState::Released)
        )
    }
}

/// Single-use settlement guard.
///
/// Starts `Pending`; the first call to [`SettleFlag::settle`] wins and every
/// later call is a no-op. All racing completion sources go through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettleFlag {
    #[default]
    Pending,
    SettledBlocked,
    SettledAllowed,
}

impl SettleFlag {
    /// Try to settle. Returns `true` only for the call that settled the flag.
    pub fn settle(&mut self, settlement: Settlement) -> bool {
        if !self.is_pending() {
            return false;
        }
        *self = match settlement {
            Settlement::Blocked => SettleFlag::SettledBlocked,
            Settlement::Allowed => SettleFlag::SettledAllowed,
        };
        true
    }

    pub fn is_pending(&self) -> bool {
        *self == SettleFlag::Pending
    }

    pub fn settlement(&self) -> Option<Settlement> {
        match self {
            SettleFlag::Pending => None,
            SettleFlag::SettledBlocked => Some(Settlement::Blocked),
            SettleFlag::SettledAllowed => Some(Settlement::Allowed),
        }
    }
}

// ── Listener ──────────────────────────────────────────────────────────────────

/// Filters the shared inbound channel down to one context's verdicts.
pub struct VerdictListener<'p> {
    context: ContextId,
    parser: &'p dyn VerdictParser,
}

impl<'p> VerdictListener<'p> {
    pub fn new(context: ContextId, parser: &'p dyn VerdictParser) -> Self {
        Self { context, parser }
    }

    /// Return the verdict in `message` if it came from this listener's
    /// context and has the verdict shape. Everything else is dropped.
    pub fn accept(&self, message: &InboundMessage) -> Option<Verdict> {
        if message.source != self.context {
            trace!(
                context_id = %self.context,
                source = %message.source,
                "dropping message from another context"
            );
            return None;
        }

        let verdict = self.parser.parse(&message.data);
        if verdict.is_none() {
            debug!(context_id = %self.context, "dropping malformed verdict message");
        }
        verdict
    }
}

// ── Live context guard ────────────────────────────────────────────────────────

/// An attached context. Detaches itself on release or drop, exactly once.
pub struct LiveContext<'h, H: ContextHost + ?Sized> {
    host: &'h mut H,
    id: ContextId,
    attached: bool,
}

impl<'h, H: ContextHost + ?Sized> LiveContext<'h, H> {
    /// Attach `context` to `host`.
    pub fn attach(host: &'h mut H, context: &ExecutionContext) -> Self {
        host.attach(context);
        Self {
            host,
            id: context.id,
            attached: true,
        }
    }

    pub fn id(&self) -> ContextId {
        self.id
    }

    /// Detach the context. Idempotent.
    pub fn release(&mut self) {
        if self.attached {
            self.attached = false;
            self.host.detach(&self.id);
        }
    }
}

impl<H: ContextHost + ?Sized> Drop for LiveContext<'_, H> {
    fn drop(&mut self) {
        if self.attached {
            warn!(context_id = %self.id, "context dropped before settlement, detaching");
        }
        self.release();
    }
}

// ── Executor ──────────────────────────────────────────────────────────────────

/// Runs one probe of the catalog to a single outcome.
pub struct ProbeExecutor<'p> {
    index: usize,
    probe: &'p ProbeDefinition,
    context: ExecutionContext,
    flag: SettleFlag,
    state: ProbeState,
}

impl<'p> ProbeExecutor<'p> {
    /// Build the context for `probe` (catalog position `index`).
    pub fn new(index: usize, probe: &'p ProbeDefinition, builder: &ContextBuilder) -> Self {
        Self {
            index,
            probe,
            context: builder.build(probe),
            flag: SettleFlag::default(),
            state: ProbeState::Created,
        }
    }

    pub fn context_id(&self) -> ContextId {
        self.context.id
    }

    pub fn state(&self) -> ProbeState {
        self.state
    }

    fn advance(&mut self, next: ProbeState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal probe transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!(probe_index = self.index, from = ?self.state, to = ?next, "probe state");
        self.state = next;
    }

    /// Attach the context and wait for it to settle.
    ///
    /// # Pipeline
    ///
    /// 1. Register a listener scoped to this context's identity
    /// 2. Arm the verdict window timer
    /// 3. Attach the context to `host`
    /// 4. Race the timer against `inbound`:
    ///    - matching verdict → settle as its `blocked` value says
    ///    - timer → settle as blocked with `TIMEOUT_DETAIL`
    ///    - foreign or malformed messages → drop, keep waiting
    ///    - channel closed → keep waiting on the timer alone
    /// 5. Cancel the timer, detach the context, return the outcome
    pub async fn run<H>(
        mut self,
        host: &mut H,
        inbound: &mut InboundReceiver,
        parser: &dyn VerdictParser,
        timeout: Duration,
    ) -> ProbeOutcome
    where
        H: ContextHost + ?Sized,
    {
        let listener = VerdictListener::new(self.context.id, parser);
        let mut timer = Box::pin(tokio::time::sleep(timeout));
        let mut live = LiveContext::attach(host, &self.context);
        self.advance(ProbeState::Pending);

        debug!(
            probe_index = self.index,
            probe = %self.probe.name,
            context_id = %live.id(),
            timeout = ?timeout,
            "probe pending"
        );

        let mut channel_open = true;
        let (settlement, detail, resolution) = loop {
            tokio::select! {
                biased;

                message = inbound.recv(), if channel_open => {
                    let Some(message) = message else {
                        debug!(probe_index = self.index, "inbound channel closed, waiting for timeout");
                        channel_open = false;
                        continue;
                    };
                    let Some(verdict) = listener.accept(&message) else {
                        continue;
                    };
                    let settlement = Settlement::from_blocked(verdict.blocked);
                    if self.flag.settle(settlement) {
                        break (settlement, verdict.detail.unwrap_or_default(), Resolution::Verdict);
                    }
                }

                () = &mut timer => {
                    let settled = self.flag.settle(Settlement::Blocked);
                    debug_assert!(settled, "timer fired after settlement");
                    break (Settlement::Blocked, TIMEOUT_DETAIL.to_string(), Resolution::Timeout);
                }
            }
        };

        drop(timer);
        self.advance(ProbeState::Settled(settlement));
        live.release();
        self.advance(ProbeState::Released);

        debug!(
            probe_index = self.index,
            probe = %self.probe.name,
            passed = settlement.passed(),
            resolution = ?resolution,
            "probe settled"
        );

        ProbeOutcome {
            index: self.index,
            name: self.probe.name.clone(),
            description: self.probe.description.clone(),
            passed: settlement.passed(),
            detail,
            resolution,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
