//! Reference scenarios.
//!
//! Each scenario wires the real harness components (policy extraction,
//! context building, schema verdict parser, suite runner) to a
//! `ScriptedHost` and runs a small, fully deterministic suite.

pub mod bundled_battery;
pub mod declared_policy;
pub mod isolation_only;

use sandprobe_contracts::{
    config::SuiteConfig,
    error::SandprobeResult,
    outcome::SuiteResult,
    probe::ProbeDefinition,
    target::TargetDescriptor,
};
use sandprobe_core::{inbound_channel, SuiteRunner};
use sandprobe_verify::SchemaVerdictParser;

use crate::{
    host::{HostEvent, ScriptedHost},
    script::ResponseScript,
};

/// What a scripted run produced: the suite result plus everything the host
/// saw along the way.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    pub result: SuiteResult,
    pub events: Vec<HostEvent>,
}

impl ScenarioRun {
    /// Content of every attached context, in attach order.
    pub fn contents(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Attached { content, .. } => Some(content.as_str()),
                HostEvent::Detached { .. } => None,
            })
            .collect()
    }
}

/// Run `probes` against `target` on a fresh `ScriptedHost` playing `script`.
///
/// Fails only if the verdict schema does not compile.
pub async fn run_scripted(
    target: &TargetDescriptor,
    probes: &[ProbeDefinition],
    script: ResponseScript,
    config: SuiteConfig,
) -> SandprobeResult<ScenarioRun> {
    let (sender, inbound) = inbound_channel();
    let host = ScriptedHost::new(sender, script);
    let log = host.log();

    let parser = SchemaVerdictParser::new()?;
    let mut runner = SuiteRunner::new(Box::new(host), inbound, Box::new(parser));
    let result = runner.run(target, probes, config).await;

    Ok(ScenarioRun {
        result,
        events: log.events(),
    })
}
