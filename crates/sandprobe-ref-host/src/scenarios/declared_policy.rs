//! Scenario B: a target that declares its own restriction policy.
//!
//! The declared directive is copied into the probe context and the hardening
//! fragment is layered on. The probe immediately reports that it was *not*
//! blocked, so the suite records a failure.

use sandprobe_contracts::{
    config::SuiteConfig, error::SandprobeResult, probe::ProbeDefinition, target::TargetDescriptor,
};

use crate::script::{Reply, ResponseScript};

use super::{run_scripted, ScenarioRun};

pub const POLICY_TEXT: &str =
    r#"<meta http-equiv="Content-Security-Policy" content="default-src 'none'; script-src 'unsafe-inline'">"#;

pub fn target() -> TargetDescriptor {
    TargetDescriptor::new("allow-scripts", "", Some(POLICY_TEXT.to_string()))
}

pub fn probe() -> ProbeDefinition {
    ProbeDefinition::new(
        "Leaky probe",
        "Reports that its capability was available",
        "parent.postMessage({ type: 'test-result', blocked: false, detail: 'x' }, '*');",
    )
}

pub async fn run_scenario(config: SuiteConfig) -> SandprobeResult<ScenarioRun> {
    let script = ResponseScript::silent().respond("Leaky probe", Reply::verdict(false, "x"));
    run_scripted(&target(), &[probe()], script, config).await
}
