//! The suite orchestrator.
//!
//! Drives the probe battery strictly one probe at a time. All probes share a
//! single inbound channel and are told apart only by the identity of the live
//! context, so probe *i + 1* is never attached before probe *i* has been
//! released. A stale message from an earlier probe that arrives late simply
//! fails the identity check of whichever probe is live at the time.

use chrono::Utc;
use tracing::{debug, info, warn};

use sandprobe_contracts::{
    config::SuiteConfig,
    outcome::SuiteResult,
    probe::ProbeDefinition,
    target::TargetDescriptor,
};
use sandprobe_context::ContextBuilder;
use sandprobe_policy::extract_policy;

use crate::{
    channel::InboundReceiver,
    executor::ProbeExecutor,
    traits::{ContextHost, VerdictParser},
};

/// Owns the host, the inbound channel and the verdict parser for a sequence
/// of suite runs.
///
/// `run` takes `&mut self`, so two suites can never read the same channel at
/// once.
pub struct SuiteRunner {
    host: Box<dyn ContextHost + Send>,
    inbound: InboundReceiver,
    parser: Box<dyn VerdictParser>,
}

impl SuiteRunner {
    /// Create a runner. `inbound` must be the receiving half of the channel
    /// whose sender the host posts context messages to.
    pub fn new(
        host: Box<dyn ContextHost + Send>,
        inbound: InboundReceiver,
        parser: Box<dyn VerdictParser>,
    ) -> Self {
        Self { host, inbound, parser }
    }

    /// Run every probe in `probes` against `target`.
    ///
    /// Never fails: the result always holds exactly one outcome per probe, in
    /// catalog order.
    pub async fn run(
        &mut self,
        target: &TargetDescriptor,
        probes: &[ProbeDefinition],
        config: SuiteConfig,
    ) -> SuiteResult {
        let started_at = Utc::now();
        let policy = extract_policy(target.restriction_policy_text.as_deref());
        let builder = ContextBuilder::new(target, &policy);
        let timeout = config.timeout();

        info!(
            probes = probes.len(),
            timeout_ms = config.timeout_millis,
            hardening = builder.hardening_enabled(),
            isolation = %target.isolation_attributes,
            "suite starting"
        );

        let mut outcomes = Vec::with_capacity(probes.len());
        for (index, probe) in probes.iter().enumerate() {
            let executor = ProbeExecutor::new(index, probe, &builder);
            let outcome = executor
                .run(self.host.as_mut(), &mut self.inbound, self.parser.as_ref(), timeout)
                .await;

            if outcome.passed {
                debug!(probe_index = index, probe = %probe.name, "probe passed");
            } else {
                warn!(
                    probe_index = index,
                    probe = %probe.name,
                    detail = %outcome.detail,
                    "capability reachable from isolated context"
                );
            }
            outcomes.push(outcome);
        }

        let result = SuiteResult::from_outcomes(outcomes, started_at, Utc::now());
        info!(
            passed = result.passed_count,
            failed = result.failed_count,
            "suite finished"
        );
        result
    }
}

/// Run `probes` against `target` with the default configuration unless
/// `options` overrides it.
pub async fn test_sandbox(
    runner: &mut SuiteRunner,
    target: &TargetDescriptor,
    probes: &[ProbeDefinition],
    options: Option<SuiteConfig>,
) -> SuiteResult {
    runner
        .run(target, probes, options.unwrap_or_default())
        .await
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use serde_json::{json, Value};

    use sandprobe_contracts::{
        config::SuiteConfig,
        context::{ContextId, ExecutionContext},
        outcome::Resolution,
        probe::ProbeDefinition,
        target::TargetDescriptor,
        verdict::{InboundMessage, Verdict, TIMEOUT_DETAIL, VERDICT_TAG},
    };

    use crate::{
        channel::{inbound_channel, InboundSender},
        traits::{ContextHost, VerdictParser},
    };

    use super::{test_sandbox, SuiteRunner};

    // ── Mock helpers ─────────────────────────────────────────────────────────

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Attached { id: ContextId, probe: String, content: String },
        Detached(ContextId),
    }

    /// What the mock "probe" does when its context is attached.
    #[derive(Clone)]
    enum Behavior {
        Silent,
        Answer { blocked: bool, detail: &'static str },
        /// Post a verdict under the identity of the previously attached
        /// context, as a late message from a released probe would.
        Stale { blocked: bool },
    }

    struct MockHost {
        events: Arc<Mutex<Vec<Event>>>,
        sender: InboundSender,
        behaviors: HashMap<String, Behavior>,
        last_attached: Option<ContextId>,
    }

    impl ContextHost for MockHost {
        fn attach(&mut self, context: &ExecutionContext) {
            self.events.lock().unwrap().push(Event::Attached {
                id: context.id,
                probe: context.probe.clone(),
                content: context.content.clone(),
            });

            let behavior = self.behaviors.get(&context.probe).cloned().unwrap_or(Behavior::Silent);
            match behavior {
                Behavior::Silent => {}
                Behavior::Answer { blocked, detail } => {
                    let body = json!({ "type": VERDICT_TAG, "blocked": blocked, "detail": detail });
                    self.sender.send(InboundMessage::new(context.id, body)).unwrap();
                }
                Behavior::Stale { blocked } => {
                    let previous = self.last_attached.expect("stale probe needs a predecessor");
                    let body = json!({ "type": VERDICT_TAG, "blocked": blocked, "detail": "stale" });
                    self.sender.send(InboundMessage::new(previous, body)).unwrap();
                }
            }
            self.last_attached = Some(context.id);
        }

        fn detach(&mut self, id: &ContextId) {
            self.events.lock().unwrap().push(Event::Detached(*id));
        }
    }

    struct MockParser;

    impl VerdictParser for MockParser {
        fn parse(&self, data: &Value) -> Option<Verdict> {
            if data.get("type")?.as_str()? != VERDICT_TAG {
                return None;
            }
            Some(Verdict {
                blocked: data.get("blocked")?.as_bool()?,
                detail: data.get("detail").and_then(Value::as_str).map(str::to_string),
            })
        }
    }

    fn runner(behaviors: &[(&str, Behavior)]) -> (SuiteRunner, Arc<Mutex<Vec<Event>>>) {
        let (tx, rx) = inbound_channel();
        let events = Arc::new(Mutex::new(vec![]));
        let host = MockHost {
            events: events.clone(),
            sender: tx,
            behaviors: behaviors
                .iter()
                .map(|(name, b)| (name.to_string(), b.clone()))
                .collect(),
            last_attached: None,
        };
        (SuiteRunner::new(Box::new(host), rx, Box::new(MockParser)), events)
    }

    fn probes(names: &[&str]) -> Vec<ProbeDefinition> {
        names
            .iter()
            .map(|n| ProbeDefinition::new(*n, format!("{n} must be blocked"), format!("probe_{n}()")))
            .collect()
    }

    fn plain_target() -> TargetDescriptor {
        TargetDescriptor::new("allow-scripts", "", None)
    }

    fn quick() -> SuiteConfig {
        SuiteConfig::with_timeout_millis(50)
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    /// One outcome per probe, ascending index, counts add up.
    #[tokio::test(start_paused = true)]
    async fn test_outcomes_cover_catalog_in_order() {
        let (mut runner, _) = runner(&[
            ("a", Behavior::Answer { blocked: true, detail: "denied" }),
            ("b", Behavior::Answer { blocked: false, detail: "reachable" }),
            ("c", Behavior::Silent),
        ]);
        let catalog = probes(&["a", "b", "c", "d"]);

        let result = runner.run(&plain_target(), &catalog, quick()).await;

        assert_eq!(result.outcomes.len(), catalog.len());
        assert_eq!(result.passed_count + result.failed_count, catalog.len());
        let indices: Vec<usize> = result.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(result.passed_count, 3);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.outcomes[1].detail, "reachable");
        assert_eq!(result.outcomes[2].resolution, Resolution::Timeout);
        assert!(result.started_at <= result.finished_at);
    }

    /// Attach of probe i+1 only ever follows the detach of probe i.
    #[tokio::test(start_paused = true)]
    async fn test_sequential_discipline() {
        let (mut runner, events) = runner(&[
            ("a", Behavior::Answer { blocked: true, detail: "" }),
            ("c", Behavior::Answer { blocked: false, detail: "" }),
        ]);

        runner.run(&plain_target(), &probes(&["a", "b", "c"]), quick()).await;

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 6);
        let order: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                Event::Attached { probe, .. } => Some(probe.as_str()),
                Event::Detached(_) => None,
            })
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        for pair in events.chunks(2) {
            match pair {
                [Event::Attached { id, .. }, Event::Detached(detached)] => {
                    assert_eq!(id, detached, "a context must be detached before the next attach");
                }
                other => panic!("expected attach/detach pair, got {:?}", other),
            }
        }
    }

    /// A late verdict addressed to a released context never touches the
    /// live probe.
    #[tokio::test(start_paused = true)]
    async fn test_stale_message_does_not_settle_current_probe() {
        let (mut runner, _) = runner(&[
            ("first", Behavior::Answer { blocked: true, detail: "ok" }),
            ("second", Behavior::Stale { blocked: false }),
        ]);

        let result = runner
            .run(&plain_target(), &probes(&["first", "second"]), quick())
            .await;

        let second = &result.outcomes[1];
        assert!(second.passed, "stale allowed-verdict must not fail the live probe");
        assert_eq!(second.detail, TIMEOUT_DETAIL);
        assert_eq!(second.resolution, Resolution::Timeout);
    }

    /// Every context gets its own identity.
    #[tokio::test(start_paused = true)]
    async fn test_each_probe_gets_fresh_identity() {
        let (mut runner, events) = runner(&[]);
        runner.run(&plain_target(), &probes(&["a", "b", "c"]), quick()).await;

        let ids: std::collections::HashSet<ContextId> = events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Attached { id, .. } => Some(*id),
                Event::Detached(_) => None,
            })
            .collect();
        assert_eq!(ids.len(), 3);
    }

    /// Hardening rides along only when the target declares a directive.
    #[tokio::test(start_paused = true)]
    async fn test_hardening_follows_declared_policy() {
        let (mut runner, events) = runner(&[]);
        let declared = TargetDescriptor::new(
            "allow-scripts",
            "",
            Some(r#"<meta http-equiv="Content-Security-Policy" content="default-src 'none'">"#.to_string()),
        );

        runner.run(&plain_target(), &probes(&["a"]), quick()).await;
        runner.run(&declared, &probes(&["a"]), quick()).await;

        let contents: Vec<String> = events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                Event::Attached { content, .. } => Some(content.clone()),
                Event::Detached(_) => None,
            })
            .collect();
        assert!(!contents[0].contains("delete window.fetch"));
        assert!(!contents[0].contains("Content-Security-Policy"));
        assert!(contents[1].contains("delete window.fetch"));
        assert!(contents[1].starts_with(
            r#"<meta http-equiv="Content-Security-Policy" content="default-src 'none'">"#
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_catalog_yields_empty_result() {
        let (mut runner, events) = runner(&[]);
        let result = runner.run(&plain_target(), &[], quick()).await;

        assert!(result.outcomes.is_empty());
        assert_eq!(result.passed_count, 0);
        assert!(events.lock().unwrap().is_empty());
    }

    /// Without options the default eight-second window applies.
    #[tokio::test(start_paused = true)]
    async fn test_sandbox_uses_default_window() {
        let (mut runner, _) = runner(&[]);
        let start = tokio::time::Instant::now();

        let result = test_sandbox(&mut runner, &plain_target(), &probes(&["a"]), None).await;

        let elapsed = start.elapsed();
        assert!(elapsed >= std::time::Duration::from_millis(8000), "elapsed {elapsed:?}");
        assert!(elapsed < std::time::Duration::from_millis(8100), "elapsed {elapsed:?}");
        assert!(result.outcomes[0].passed);
    }
}
