//! Response scripts for the scripted host.
//!
//! A script decides what each probe "posts" once its context is attached.
//! Replies are keyed by probe name; probes with no entry get the script's
//! default reply, which is `Silent` unless overridden.
//!
//! ```toml
//! [default]
//! kind = "silent"
//!
//! [responses."Cookie read"]
//! kind = "verdict"
//! blocked = true
//! detail = 'cookie = ""'
//!
//! [responses."Geolocation"]
//! kind = "delayed"
//! after_millis = 20
//! reply = { kind = "verdict", blocked = true, detail = "User denied Geolocation" }
//! ```

use std::{collections::HashMap, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sandprobe_contracts::{
    context::ContextId,
    error::{SandprobeError, SandprobeResult},
    verdict::{InboundMessage, Verdict},
};

/// What a scripted probe does after its context is attached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Reply {
    /// Post nothing. The probe settles on its timeout.
    #[default]
    Silent,
    /// Post a well-formed verdict from the live context.
    Verdict {
        blocked: bool,
        #[serde(default)]
        detail: Option<String>,
    },
    /// Post an arbitrary value from the live context.
    Raw { data: Value },
    /// Post a value under the identity of the previously detached context.
    Stale { data: Value },
    /// Perform `reply` after `after_millis`.
    Delayed { after_millis: u64, reply: Box<Reply> },
}

impl Reply {
    pub fn verdict(blocked: bool, detail: impl Into<String>) -> Self {
        Reply::Verdict {
            blocked,
            detail: Some(detail.into()),
        }
    }

    pub fn delayed(after_millis: u64, reply: Reply) -> Self {
        Reply::Delayed {
            after_millis,
            reply: Box::new(reply),
        }
    }

    /// Resolve this reply into the message to deliver and the delay before
    /// delivering it.
    ///
    /// `live` is the identity of the context just attached; `retired` is the
    /// identity of the last detached one, if any. A `Stale` reply with no
    /// retired context is posted under a fresh identity nobody listens for.
    pub fn resolve(
        &self,
        live: ContextId,
        retired: Option<ContextId>,
    ) -> Option<(Duration, InboundMessage)> {
        match self {
            Reply::Silent => None,
            Reply::Verdict { blocked, detail } => {
                let verdict = Verdict {
                    blocked: *blocked,
                    detail: detail.clone(),
                };
                Some((Duration::ZERO, InboundMessage::new(live, verdict.to_message())))
            }
            Reply::Raw { data } => Some((Duration::ZERO, InboundMessage::new(live, data.clone()))),
            Reply::Stale { data } => {
                let source = retired.unwrap_or_default();
                Some((Duration::ZERO, InboundMessage::new(source, data.clone())))
            }
            Reply::Delayed { after_millis, reply } => reply
                .resolve(live, retired)
                .map(|(delay, message)| (delay + Duration::from_millis(*after_millis), message)),
        }
    }
}

/// Replies keyed by probe name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseScript {
    #[serde(default)]
    pub default: Reply,
    #[serde(default)]
    pub responses: HashMap<String, Reply>,
}

impl ResponseScript {
    /// A script where every probe stays silent.
    pub fn silent() -> Self {
        Self::default()
    }

    /// A script where every probe not listed otherwise gets `reply`.
    pub fn with_default(reply: Reply) -> Self {
        Self {
            default: reply,
            responses: HashMap::new(),
        }
    }

    /// Builder-style: script `reply` for the probe named `probe`.
    pub fn respond(mut self, probe: impl Into<String>, reply: Reply) -> Self {
        self.responses.insert(probe.into(), reply);
        self
    }

    pub fn reply_for(&self, probe: &str) -> &Reply {
        self.responses.get(probe).unwrap_or(&self.default)
    }

    /// Parse `s` as a TOML response script.
    ///
    /// Returns `SandprobeError::ConfigError` if the TOML is malformed or a
    /// reply has an unknown `kind`.
    pub fn from_toml_str(s: &str) -> SandprobeResult<Self> {
        toml::from_str(s).map_err(|e| SandprobeError::ConfigError {
            reason: format!("failed to parse response script TOML: {}", e),
        })
    }

    /// Read the file at `path` and parse it as a TOML response script.
    pub fn from_file(path: &Path) -> SandprobeResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| SandprobeError::ConfigError {
            reason: format!("failed to read response script '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }
}
