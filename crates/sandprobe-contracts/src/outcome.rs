//! Per-probe outcomes and the aggregated suite result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a probe reached its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// The probe reported a verdict for its own context.
    Verdict,
    /// The window elapsed with no verdict; treated as blocked.
    Timeout,
}

/// The settled result of one probe. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Position of the probe in its catalog.
    pub index: usize,
    pub name: String,
    pub description: String,
    /// True when the probed capability was blocked (or the probe timed out).
    pub passed: bool,
    pub detail: String,
    pub resolution: Resolution,
}

/// The complete result of one suite run.
///
/// `passed_count + failed_count == outcomes.len()`, and outcomes are ordered
/// by ascending `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub passed_count: usize,
    pub failed_count: usize,
    pub outcomes: Vec<ProbeOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SuiteResult {
    /// Tally `outcomes` into a finished result.
    pub fn from_outcomes(
        outcomes: Vec<ProbeOutcome>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let passed_count = outcomes.iter().filter(|o| o.passed).count();
        Self {
            passed_count,
            failed_count: outcomes.len() - passed_count,
            outcomes,
            started_at,
            finished_at,
        }
    }

    /// True when every probe found its capability blocked.
    pub fn all_passed(&self) -> bool {
        self.failed_count == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}
