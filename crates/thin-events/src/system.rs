//! Listener registry and bubbling dispatch

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use thin_dom::{DomTree, NodeId};

use crate::{Event, ListenerBackend};

/// A registered event handler.
///
/// Called with the receiver node first (the node the callback should treat
/// as itself) and the in-flight event second. Handlers are shared immutable
/// closures: the same handler may hang off many nodes, and a running handler
/// may dispatch further events that re-enter it. Handler state goes behind
/// interior mutability on the caller's side.
pub type Handler = Rc<dyn Fn(NodeId, &mut Event)>;

/// Wrap a closure as a shareable handler
pub fn handler<F>(f: F) -> Handler
where
    F: Fn(NodeId, &mut Event) + 'static,
{
    Rc::new(f)
}

/// Listener registry keyed by (node, event key).
///
/// Registrations accumulate: there is no removal and no de-duplication, so
/// binding the same handler twice means it runs twice.
#[derive(Default)]
pub struct EventSystem {
    listeners: HashMap<(NodeId, String), Vec<Handler>>,
}

impl EventSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a literal registry key
    pub fn add(&mut self, node: NodeId, key: &str, handler: Handler) {
        self.listeners
            .entry((node, key.to_string()))
            .or_default()
            .push(handler);
    }

    /// Number of handlers registered under a key
    pub fn listener_count(&self, node: NodeId, key: &str) -> usize {
        self.listeners
            .get(&(node, key.to_string()))
            .map_or(0, Vec::len)
    }

    fn handlers_for(&self, node: NodeId, key: &str) -> Vec<Handler> {
        self.listeners
            .get(&(node, key.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Build the propagation path for an event: the target itself, then its
    /// ancestors up to the root when the event bubbles
    pub fn propagation_path(tree: &DomTree, event: &Event) -> Vec<NodeId> {
        let mut path = vec![event.target()];
        if event.bubbles() {
            path.extend(tree.ancestors(event.target()));
        }
        path
    }

    /// Dispatch an event along a propagation path.
    ///
    /// The registry is taken through a RefCell so handlers can register
    /// further listeners while the event is in flight; the handler list for
    /// each node is snapshotted before any handler runs, so mid-dispatch
    /// registrations only see later events.
    pub fn dispatch(
        cell: &RefCell<EventSystem>,
        path: &[NodeId],
        event: &mut Event,
        backend: &dyn ListenerBackend,
    ) {
        let key = backend.registry_key(event.name());
        tracing::trace!("Dispatching {} along {} node(s)", event.name(), path.len());

        for &node in path {
            if event.is_propagation_stopped() {
                break;
            }
            event.set_current_target(node);
            let snapshot = cell.borrow().handlers_for(node, &key);
            for h in snapshot {
                (*h)(node, event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BackendKind, StandardBackend};

    fn tree_with_chain() -> (DomTree, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("button");
        tree.append_child(tree.root(), outer).unwrap();
        tree.append_child(outer, inner).unwrap();
        (tree, outer, inner)
    }

    #[test]
    fn test_dispatch_bubbles_target_first() {
        let (tree, outer, inner) = tree_with_chain();
        let cell = RefCell::new(EventSystem::new());
        let order = Rc::new(RefCell::new(Vec::new()));

        for node in [inner, outer, tree.root()] {
            let order = order.clone();
            cell.borrow_mut().add(
                node,
                "click",
                handler(move |receiver, _ev| order.borrow_mut().push(receiver)),
            );
        }

        let mut event = Event::new("click", inner);
        let path = EventSystem::propagation_path(&tree, &event);
        EventSystem::dispatch(&cell, &path, &mut event, &StandardBackend);

        assert_eq!(*order.borrow(), vec![inner, outer, tree.root()]);
    }

    #[test]
    fn test_stop_propagation_halts_bubbling() {
        let (tree, outer, inner) = tree_with_chain();
        let cell = RefCell::new(EventSystem::new());
        let reached_outer = Rc::new(RefCell::new(false));

        cell.borrow_mut().add(
            inner,
            "click",
            handler(|_receiver, ev: &mut Event| ev.stop_propagation()),
        );
        {
            let reached_outer = reached_outer.clone();
            cell.borrow_mut().add(
                outer,
                "click",
                handler(move |_receiver, _ev| *reached_outer.borrow_mut() = true),
            );
        }

        let mut event = Event::new("click", inner);
        let path = EventSystem::propagation_path(&tree, &event);
        EventSystem::dispatch(&cell, &path, &mut event, &StandardBackend);

        assert!(!*reached_outer.borrow());
    }

    #[test]
    fn test_handlers_accumulate_without_dedup() {
        let (tree, _outer, inner) = tree_with_chain();
        let cell = RefCell::new(EventSystem::new());
        let count = Rc::new(RefCell::new(0));

        let shared = {
            let count = count.clone();
            handler(move |_receiver, _ev| *count.borrow_mut() += 1)
        };
        cell.borrow_mut().add(inner, "click", shared.clone());
        cell.borrow_mut().add(inner, "click", shared);
        assert_eq!(cell.borrow().listener_count(inner, "click"), 2);

        let mut event = Event::new("click", inner);
        let path = EventSystem::propagation_path(&tree, &event);
        EventSystem::dispatch(&cell, &path, &mut event, &StandardBackend);

        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_handler_can_register_mid_dispatch() {
        let (tree, outer, inner) = tree_with_chain();
        let cell = Rc::new(RefCell::new(EventSystem::new()));
        let late_ran = Rc::new(RefCell::new(false));

        {
            let cell2 = cell.clone();
            let late_ran = late_ran.clone();
            cell.borrow_mut().add(
                inner,
                "click",
                handler(move |_receiver, _ev| {
                    let late_ran = late_ran.clone();
                    cell2.borrow_mut().add(
                        outer,
                        "click",
                        handler(move |_r, _e| *late_ran.borrow_mut() = true),
                    );
                }),
            );
        }

        let mut event = Event::new("click", inner);
        let path = EventSystem::propagation_path(&tree, &event);
        EventSystem::dispatch(&cell, &path, &mut event, &StandardBackend);

        // registered while the event was at the target, so the ancestor
        // node's snapshot (taken later) does include it
        assert!(*late_ran.borrow());
    }

    #[test]
    fn test_shared_handler_survives_nested_dispatch() {
        let (tree, outer, inner) = tree_with_chain();
        let cell = Rc::new(RefCell::new(EventSystem::new()));
        let received = Rc::new(RefCell::new(Vec::new()));

        // one handler registered on two nodes; the inner invocation
        // dispatches again, re-entering the same closure
        let shared = {
            let received = received.clone();
            let cell2 = cell.clone();
            let tree_path = EventSystem::propagation_path(&tree, &Event::new("click", outer));
            handler(move |receiver: NodeId, _ev: &mut Event| {
                received.borrow_mut().push(receiver);
                if receiver == inner {
                    let mut forwarded = Event::new("click", outer);
                    EventSystem::dispatch(&cell2, &tree_path, &mut forwarded, &StandardBackend);
                }
            })
        };
        cell.borrow_mut().add(inner, "click", shared.clone());
        cell.borrow_mut().add(outer, "click", shared);

        let mut event = Event::new("click", inner);
        let path = EventSystem::propagation_path(&tree, &event);
        EventSystem::dispatch(&cell, &path, &mut event, &StandardBackend);

        // inner ran, forwarded to outer (nested), then the original
        // event reached outer as well
        assert_eq!(*received.borrow(), vec![inner, outer, outer]);
    }

    #[test]
    fn test_legacy_backend_receiver_is_target() {
        let (tree, outer, inner) = tree_with_chain();
        let cell = RefCell::new(EventSystem::new());
        let backend = BackendKind::Legacy.create();
        let received = Rc::new(RefCell::new(Vec::new()));

        {
            let received = received.clone();
            let mut system = cell.borrow_mut();
            backend.add_listener(
                &mut system,
                outer,
                "click",
                handler(move |receiver, _ev| received.borrow_mut().push(receiver)),
            );
        }
        // stored under the prefixed key, invisible to bare-name lookups
        assert_eq!(cell.borrow().listener_count(outer, "onclick"), 1);
        assert_eq!(cell.borrow().listener_count(outer, "click"), 0);

        let mut event = Event::new("click", inner);
        let path = EventSystem::propagation_path(&tree, &event);
        EventSystem::dispatch(&cell, &path, &mut event, backend.as_ref());

        // handler hangs off `outer` but sees the actual target as receiver
        assert_eq!(*received.borrow(), vec![inner]);
    }
}
