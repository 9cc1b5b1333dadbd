//! The three content fragments of a probe context.
//!
//! Each fragment owns one presence rule and one rendering. They are composed
//! in a fixed order by [`crate::builder::ContextContent::serialize`]:
//!
//!   policy declaration → hardening → probe payload

use std::sync::LazyLock;

use regex::Regex;

/// A piece of serialized context content.
pub trait Fragment {
    /// Append this fragment's markup to `out`.
    fn render(&self, out: &mut String);
}

// ── Policy declaration ────────────────────────────────────────────────────────

/// Re-declares the target's restriction directive inside the probe context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyFragment {
    directive: String,
}

impl PolicyFragment {
    /// Present iff the target declared a directive.
    pub fn for_directive(directive: Option<&str>) -> Option<Self> {
        directive.map(|d| Self {
            directive: d.to_string(),
        })
    }

    pub fn directive(&self) -> &str {
        &self.directive
    }
}

impl Fragment for PolicyFragment {
    fn render(&self, out: &mut String) {
        out.push_str(r#"<meta http-equiv="Content-Security-Policy" content=""#);
        out.push_str(&self.directive);
        out.push_str(r#"">"#);
    }
}

// ── Hardening ─────────────────────────────────────────────────────────────────

/// Global capability entry points the hardening fragment neutralizes.
///
/// Network primitives are deleted outright; `sendBeacon` is also pinned to a
/// non-writable stand-in on the prototype so it cannot be recovered.
pub const NEUTRALIZED_ENTRY_POINTS: &[&str] = &[
    "fetch",
    "XMLHttpRequest",
    "WebSocket",
    "EventSource",
    "navigator.sendBeacon",
    "alert",
    "confirm",
    "prompt",
    "HTMLFormElement.prototype.submit",
    "HTMLFormElement.prototype.requestSubmit",
];

const HARDENING_SCRIPT: &str = r#"<script>
    delete window.fetch;
    delete window.XMLHttpRequest;
    delete window.WebSocket;
    delete window.EventSource;
    try { delete window.navigator.sendBeacon; } catch(e) {}
    window.alert = function() {};
    window.confirm = function() { return false; };
    window.prompt = function() { return null; };
    try { Object.defineProperty(Navigator.prototype, 'sendBeacon', { value: function() { return false; }, writable: false, configurable: false }); } catch(e) {}
    HTMLFormElement.prototype.submit = function() {};
    HTMLFormElement.prototype.requestSubmit = function() {};
  </script>"#;

/// Harness-side neutralization of global capability entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardeningFragment;

impl HardeningFragment {
    /// Present iff hardening is enabled for the run.
    pub fn when(enabled: bool) -> Option<Self> {
        enabled.then_some(Self)
    }
}

impl Fragment for HardeningFragment {
    fn render(&self, out: &mut String) {
        out.push_str(HARDENING_SCRIPT);
    }
}

// ── Payload ───────────────────────────────────────────────────────────────────

/// HTML end tags match regardless of case.
static CLOSING_SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</(script)").expect("closing script tag pattern is valid")
});

/// The probe payload, wrapped so it runs as soon as the context loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFragment {
    payload: String,
}

impl PayloadFragment {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
        }
    }
}

impl Fragment for PayloadFragment {
    fn render(&self, out: &mut String) {
        out.push_str("<script>");
        // A literal closing tag would end the wrapper early.
        out.push_str(&CLOSING_SCRIPT_TAG.replace_all(&self.payload, r"<\/$1"));
        out.push_str("</script>");
    }
}
