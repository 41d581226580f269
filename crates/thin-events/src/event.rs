//! Dispatched event

use thin_dom::NodeId;

/// An event travelling through the tree
#[derive(Debug)]
pub struct Event {
    name: String,
    target: NodeId,
    current_target: NodeId,
    bubbles: bool,
    propagation_stopped: bool,
    default_prevented: bool,
}

impl Event {
    /// Create a bubbling event
    pub fn new(name: &str, target: NodeId) -> Self {
        Self {
            name: name.to_string(),
            target,
            current_target: target,
            bubbles: true,
            propagation_stopped: false,
            default_prevented: false,
        }
    }

    /// Create a non-bubbling event (e.g. "load")
    pub fn non_bubbling(name: &str, target: NodeId) -> Self {
        Self {
            bubbles: false,
            ..Self::new(name, target)
        }
    }

    /// Event name, e.g. "click"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node the event was dispatched on
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node currently receiving the event during propagation
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    pub(crate) fn set_current_target(&mut self, node: NodeId) {
        self.current_target = node;
    }

    /// Whether the event travels up the ancestor chain
    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    /// Stop propagation after the current node's handlers
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    /// Prevent the default action
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}
