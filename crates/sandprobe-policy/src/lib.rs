//! # sandprobe-policy
//!
//! Extracts the restriction directive a target declares in its own document
//! text.
//!
//! This is deliberately shallow: the harness only needs to know *whether*
//! the target declared a default-source directive and what its value is, so
//! it can be re-declared inside each probe context. The directive is never
//! parsed or validated.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use sandprobe_policy::extract_policy;
//!
//! let policy = extract_policy(Some(r#"<meta content="default-src 'none'">"#));
//! assert_eq!(policy.directive.as_deref(), Some("default-src 'none'"));
//! ```

pub mod extract;

pub use extract::extract_policy;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use crate::extract_policy;

    // ── 1. recognized forms ──────────────────────────────────────────────────

    #[test]
    fn test_double_quoted_directive() {
        let policy = extract_policy(Some(r#"content="default-src 'none'""#));
        assert_eq!(policy.directive.as_deref(), Some("default-src 'none'"));
    }

    #[test]
    fn test_single_quoted_directive() {
        let policy = extract_policy(Some("content='default-src *'"));
        assert_eq!(policy.directive.as_deref(), Some("default-src *"));
    }

    #[test]
    fn test_directive_inside_meta_element() {
        let doc = r#"<html><head>
            <meta http-equiv="Content-Security-Policy"
                  content = "default-src 'none'; script-src 'unsafe-inline'">
        </head><body></body></html>"#;

        let policy = extract_policy(Some(doc));
        assert_eq!(
            policy.directive.as_deref(),
            Some("default-src 'none'; script-src 'unsafe-inline'")
        );
    }

    #[test]
    fn test_case_insensitive_match_keeps_original_text() {
        let policy = extract_policy(Some(r#"CONTENT="Default-Src 'self'""#));
        assert_eq!(policy.directive.as_deref(), Some("Default-Src 'self'"));
    }

    // ── 2. precedence ────────────────────────────────────────────────────────

    /// Double-quoted values win even when a single-quoted one appears first.
    #[test]
    fn test_double_quoted_form_takes_precedence() {
        let doc = r#"<meta content='default-src *'><meta content="default-src 'none'">"#;
        let policy = extract_policy(Some(doc));
        assert_eq!(policy.directive.as_deref(), Some("default-src 'none'"));
    }

    #[test]
    fn test_first_match_wins() {
        let doc = r#"<meta content="default-src 'self'"><meta content="default-src 'none'">"#;
        let policy = extract_policy(Some(doc));
        assert_eq!(policy.directive.as_deref(), Some("default-src 'self'"));
    }

    /// A content attribute without the marker is skipped, not returned.
    #[test]
    fn test_content_without_marker_is_skipped() {
        let doc = r#"<meta name="viewport" content="width=device-width"><meta content="default-src 'none'">"#;
        let policy = extract_policy(Some(doc));
        assert_eq!(policy.directive.as_deref(), Some("default-src 'none'"));
    }

    // ── 3. absence ───────────────────────────────────────────────────────────

    #[test]
    fn test_no_marker_yields_none() {
        let policy = extract_policy(Some(r#"<meta name="viewport" content="width=device-width">"#));
        assert_eq!(policy.directive, None);
        assert!(!policy.hardening_enabled());
    }

    #[test]
    fn test_absent_and_empty_input_yield_none() {
        assert_eq!(extract_policy(None).directive, None);
        assert_eq!(extract_policy(Some("")).directive, None);
    }

    #[test]
    fn test_marker_outside_content_attribute_is_ignored() {
        let policy = extract_policy(Some("<p>default-src 'none'</p>"));
        assert_eq!(policy.directive, None);
    }
}
