//! Directive extraction.
//!
//! The target declares its restriction policy inside its own document text,
//! typically as a meta element:
//!
//! ```html
//! <meta http-equiv="Content-Security-Policy" content="default-src 'none'">
//! ```
//!
//! Extraction looks for a `content` attribute whose value mentions
//! `default-src`. Double-quoted values are searched first across the whole
//! text, then single-quoted ones. Matching is case-insensitive and tolerates
//! whitespace around `=`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use sandprobe_contracts::target::ExtractedPolicy;

static DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)content\s*=\s*"([^"]*default-src[^"]*)""#)
        .expect("double-quoted directive pattern is valid")
});

static SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)content\s*=\s*'([^']*default-src[^']*)'"#)
        .expect("single-quoted directive pattern is valid")
});

/// Derive the restriction directive from `text`.
///
/// Returns `ExtractedPolicy { directive: None }` when `text` is absent, empty,
/// or contains no recognizable directive. Never fails.
pub fn extract_policy(text: Option<&str>) -> ExtractedPolicy {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return ExtractedPolicy::none();
    };

    let directive = [&*DOUBLE_QUOTED, &*SINGLE_QUOTED]
        .into_iter()
        .find_map(|pattern| pattern.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    match &directive {
        Some(d) => debug!(directive = %d, "restriction directive extracted"),
        None => debug!("no restriction directive declared"),
    }

    ExtractedPolicy { directive }
}
