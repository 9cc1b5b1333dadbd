//! Scenario A: isolation attributes only.
//!
//! The target declares no restriction policy, so no hardening is layered on.
//! The single probe never answers and is settled as blocked when its window
//! elapses.

use sandprobe_contracts::{
    config::SuiteConfig, error::SandprobeResult, probe::ProbeDefinition, target::TargetDescriptor,
};

use crate::script::ResponseScript;

use super::{run_scripted, ScenarioRun};

pub fn target() -> TargetDescriptor {
    TargetDescriptor::new("allow-scripts", "", None)
}

pub fn probe() -> ProbeDefinition {
    ProbeDefinition::new(
        "Silent probe",
        "Never reports; must settle as blocked on timeout",
        "/* waits forever */",
    )
}

pub async fn run_scenario(config: SuiteConfig) -> SandprobeResult<ScenarioRun> {
    run_scripted(&target(), &[probe()], ResponseScript::silent(), config).await
}
