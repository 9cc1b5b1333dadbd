//! Scenario C: the bundled battery against a hardened target.
//!
//! Every bundled probe runs against a target with a strict policy and no
//! device allowances, replying the way such a target would. Some replies are
//! late, malformed or posted from a retired context; all of them must still
//! settle as blocked.

use sandprobe_catalog::ProbeCatalog;
use sandprobe_contracts::{config::SuiteConfig, error::SandprobeResult, target::TargetDescriptor};

use crate::script::ResponseScript;

use super::{run_scripted, ScenarioRun};

/// Replies of a correctly hardened target, keyed by bundled probe name.
const HARDENED_RESPONSES: &str = include_str!("../../responses/hardened.toml");

pub const POLICY_TEXT: &str = r#"<meta http-equiv="Content-Security-Policy" content="default-src 'none'; script-src 'unsafe-inline'; style-src 'unsafe-inline'">"#;

pub fn target() -> TargetDescriptor {
    TargetDescriptor::new(
        "allow-scripts",
        "camera 'none'; microphone 'none'; geolocation 'none'",
        Some(POLICY_TEXT.to_string()),
    )
}

pub fn hardened_script() -> SandprobeResult<ResponseScript> {
    ResponseScript::from_toml_str(HARDENED_RESPONSES)
}

pub async fn run_scenario(config: SuiteConfig) -> SandprobeResult<ScenarioRun> {
    let catalog = ProbeCatalog::bundled()?;
    run_scripted(&target(), &catalog.probes, hardened_script()?, config).await
}
