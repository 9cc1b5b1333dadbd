//! # sandprobe-contracts
//!
//! Shared types, the verdict message contract, and error types for the
//! sandprobe harness.
//!
//! All crates in the workspace import from here. No orchestration logic lives
//! in this crate, only data definitions and errors.

pub mod config;
pub mod context;
pub mod error;
pub mod outcome;
pub mod probe;
pub mod target;
pub mod verdict;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use config::{SuiteConfig, DEFAULT_TIMEOUT_MILLIS};
    use context::ContextId;
    use error::SandprobeError;
    use outcome::{ProbeOutcome, Resolution, SuiteResult};
    use target::{ExtractedPolicy, TargetDescriptor};
    use verdict::{Verdict, VERDICT_TAG};

    fn outcome(index: usize, passed: bool) -> ProbeOutcome {
        ProbeOutcome {
            index,
            name: format!("probe-{index}"),
            description: String::new(),
            passed,
            detail: String::new(),
            resolution: Resolution::Verdict,
        }
    }

    // ── ExtractedPolicy ──────────────────────────────────────────────────────

    #[test]
    fn hardening_follows_directive_presence() {
        assert!(!ExtractedPolicy::none().hardening_enabled());
        assert!(ExtractedPolicy::from_directive("default-src 'none'").hardening_enabled());
    }

    // ── ContextId ────────────────────────────────────────────────────────────

    #[test]
    fn context_id_new_produces_unique_values() {
        let ids: std::collections::HashSet<ContextId> =
            (0..100).map(|_| ContextId::new()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── Verdict ──────────────────────────────────────────────────────────────

    #[test]
    fn verdict_message_carries_tag_and_fields() {
        let msg = Verdict { blocked: false, detail: Some("x".to_string()) }.to_message();
        assert_eq!(msg["type"], VERDICT_TAG);
        assert_eq!(msg["blocked"], false);
        assert_eq!(msg["detail"], "x");
    }

    #[test]
    fn verdict_message_omits_absent_detail() {
        let msg = Verdict { blocked: true, detail: None }.to_message();
        assert!(msg.get("detail").is_none());
    }

    // ── SuiteResult ──────────────────────────────────────────────────────────

    #[test]
    fn suite_result_tallies_outcomes() {
        let now = Utc::now();
        let result = SuiteResult::from_outcomes(
            vec![outcome(0, true), outcome(1, false), outcome(2, true)],
            now,
            now,
        );

        assert_eq!(result.passed_count, 2);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.passed_count + result.failed_count, result.outcomes.len());
        assert!(!result.all_passed());
        assert_eq!(result.failures().map(|o| o.index).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn empty_suite_result_is_all_passed() {
        let now = Utc::now();
        let result = SuiteResult::from_outcomes(vec![], now, now);
        assert_eq!(result.passed_count, 0);
        assert_eq!(result.failed_count, 0);
        assert!(result.all_passed());
    }

    // ── Config ───────────────────────────────────────────────────────────────

    #[test]
    fn suite_config_defaults_to_eight_seconds() {
        let config = SuiteConfig::default();
        assert_eq!(config.timeout_millis, DEFAULT_TIMEOUT_MILLIS);
        assert_eq!(config.timeout(), std::time::Duration::from_millis(8000));

        let decoded: SuiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn target_descriptor_fields_default_when_missing() {
        let target: TargetDescriptor =
            serde_json::from_str(r#"{ "isolation_attributes": "allow-scripts" }"#).unwrap();
        assert_eq!(target.isolation_attributes, "allow-scripts");
        assert_eq!(target.capability_allowances, "");
        assert_eq!(target.restriction_policy_text, None);
    }

    // ── SandprobeError display messages ──────────────────────────────────────

    #[test]
    fn error_config_error_display() {
        let err = SandprobeError::ConfigError { reason: "missing target".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("configuration error"));
        assert!(msg.contains("missing target"));
    }

    #[test]
    fn error_catalog_error_display() {
        let err = SandprobeError::CatalogError { reason: "empty catalog".to_string() };
        let msg = err.to_string();
        assert!(msg.contains("catalog error"));
        assert!(msg.contains("empty catalog"));
    }

    #[test]
    fn error_schema_error_display() {
        let err = SandprobeError::SchemaError { reason: "bad keyword".to_string() };
        assert!(err.to_string().contains("schema error"));
    }
}
