//! An in-process `ContextHost` driven by a response script.
//!
//! `ScriptedHost` stands in for the embedding document. It records every
//! attach and detach, and on attach it posts whatever the script says the
//! probe would have posted, tagged with the right (or deliberately wrong)
//! context identity.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use sandprobe_contracts::{
    context::{ContextId, ExecutionContext},
    verdict::InboundMessage,
};
use sandprobe_core::{traits::ContextHost, InboundSender};

use crate::script::ResponseScript;

/// One observable host operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Attached {
        id: ContextId,
        probe: String,
        isolation_attributes: String,
        content: String,
    },
    Detached {
        id: ContextId,
    },
}

/// Shared, inspectable record of host events.
///
/// Clone it before handing the host to a runner to keep a handle.
#[derive(Debug, Clone, Default)]
pub struct HostLog(Arc<Mutex<Vec<HostEvent>>>);

impl HostLog {
    fn push(&self, event: HostEvent) {
        self.0.lock().expect("host log lock poisoned").push(event);
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.0.lock().expect("host log lock poisoned").clone()
    }

    /// Content of every attached context, in attach order.
    pub fn attached_contents(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Attached { content, .. } => Some(content),
                HostEvent::Detached { .. } => None,
            })
            .collect()
    }
}

/// A `ContextHost` whose probes reply according to a `ResponseScript`.
pub struct ScriptedHost {
    sender: InboundSender,
    script: ResponseScript,
    log: HostLog,
    live: Option<ContextId>,
    retired: Option<ContextId>,
}

impl ScriptedHost {
    pub fn new(sender: InboundSender, script: ResponseScript) -> Self {
        Self {
            sender,
            script,
            log: HostLog::default(),
            live: None,
            retired: None,
        }
    }

    pub fn log(&self) -> HostLog {
        self.log.clone()
    }

    fn deliver(&self, message: InboundMessage) {
        if self.sender.send(message).is_err() {
            debug!("inbound channel closed; scripted reply dropped");
        }
    }
}

impl ContextHost for ScriptedHost {
    fn attach(&mut self, context: &ExecutionContext) {
        if let Some(previous) = self.live {
            warn!(context_id = %previous, "attach while another context is still live");
        }
        self.live = Some(context.id);
        self.log.push(HostEvent::Attached {
            id: context.id,
            probe: context.probe.clone(),
            isolation_attributes: context.isolation_attributes.clone(),
            content: context.content.clone(),
        });

        let reply = self.script.reply_for(&context.probe);
        let Some((delay, message)) = reply.resolve(context.id, self.retired) else {
            debug!(context_id = %context.id, probe = %context.probe, "scripted probe stays silent");
            return;
        };

        if delay.is_zero() {
            self.deliver(message);
            return;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let sender = self.sender.clone();
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    // The run may be over by now.
                    let _ = sender.send(message);
                });
            }
            Err(_) => {
                warn!(probe = %context.probe, "no async runtime; delayed reply dropped");
            }
        }
    }

    fn detach(&mut self, id: &ContextId) {
        if self.live != Some(*id) {
            warn!(context_id = %id, "detach of a context that is not live");
        }
        self.live = None;
        self.retired = Some(*id);
        self.log.push(HostEvent::Detached { id: *id });
    }
}
