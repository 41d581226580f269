//! Listener-registration capability seam
//!
//! Hosts differ in how listeners are attached: the standard form takes bare
//! event names and invokes callbacks with the node the listener hangs off,
//! the legacy form wants "on"-prefixed names and gives callbacks no useful
//! receiver at all. One backend is selected at startup and everything else
//! talks to the trait.

use thin_dom::NodeId;

use crate::{handler, Event, EventSystem, Handler};

/// Which listener-registration capability the host exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Bare event names, receiver = attached node
    #[default]
    Standard,
    /// "on"-prefixed names, no content-loaded signal
    Legacy,
}

impl BackendKind {
    pub fn create(self) -> Box<dyn ListenerBackend> {
        match self {
            BackendKind::Standard => Box::new(StandardBackend),
            BackendKind::Legacy => Box::new(LegacyBackend),
        }
    }

    /// Whether the host delivers a native content-loaded signal
    pub fn has_content_loaded(self) -> bool {
        matches!(self, BackendKind::Standard)
    }
}

/// Capability interface for attaching listeners
pub trait ListenerBackend {
    /// Registry key used for a caller-facing event name
    fn registry_key(&self, name: &str) -> String;

    /// Attach a handler for a caller-facing event name
    fn add_listener(&self, system: &mut EventSystem, node: NodeId, name: &str, handler: Handler);
}

/// Standard registration: handlers stored as-is under the bare name
pub struct StandardBackend;

impl ListenerBackend for StandardBackend {
    fn registry_key(&self, name: &str) -> String {
        name.to_string()
    }

    fn add_listener(&self, system: &mut EventSystem, node: NodeId, name: &str, handler: Handler) {
        system.add(node, name, handler);
    }
}

/// Legacy registration: stores under `on<name>` and wraps the handler so
/// the receiver it sees is the event's actual target rather than the node
/// the listener was attached to.
pub struct LegacyBackend;

impl ListenerBackend for LegacyBackend {
    fn registry_key(&self, name: &str) -> String {
        format!("on{name}")
    }

    fn add_listener(&self, system: &mut EventSystem, node: NodeId, name: &str, h: Handler) {
        let wrapped = handler(move |_attached, event: &mut Event| {
            let target = event.target();
            (*h)(target, event);
        });
        system.add(node, &self.registry_key(name), wrapped);
    }
}
