//! Element sets - selection, iteration, binding, delegation
//!
//! The operations here never fail: an empty set turns them all into
//! no-ops, and selection misses produce empty sets rather than errors.

use thin_dom::{selector, NodeId};
use thin_events::Event;

use crate::Page;

/// What an element set can be built from
#[derive(Debug, Clone)]
pub enum Selection {
    /// CSS selector string, queried from the document root
    Css(String),
    /// A single node
    Node(NodeId),
    /// An existing node list, passed through
    Nodes(Vec<NodeId>),
}

impl From<&str> for Selection {
    fn from(css: &str) -> Self {
        Selection::Css(css.to_string())
    }
}

impl From<String> for Selection {
    fn from(css: String) -> Self {
        Selection::Css(css)
    }
}

impl From<NodeId> for Selection {
    fn from(node: NodeId) -> Self {
        Selection::Node(node)
    }
}

impl From<Vec<NodeId>> for Selection {
    fn from(nodes: Vec<NodeId>) -> Self {
        Selection::Nodes(nodes)
    }
}

impl From<&ElementSet> for Selection {
    fn from(set: &ElementSet) -> Self {
        Selection::Nodes(set.nodes.clone())
    }
}

/// Ordered set of elements with chainable operations.
///
/// Sets built from a CSS string remember it; delegation (`live`) needs
/// that original selector to re-match targets at event time.
pub struct ElementSet {
    page: Page,
    nodes: Vec<NodeId>,
    selector: Option<String>,
}

impl ElementSet {
    pub(crate) fn resolve(page: &Page, selection: Selection) -> ElementSet {
        match selection {
            Selection::Css(css) => {
                let nodes = {
                    let doc = page.document();
                    selector::query_selector_all(doc.tree(), doc.tree().root(), &css)
                };
                ElementSet {
                    page: page.clone(),
                    nodes,
                    selector: Some(css),
                }
            }
            Selection::Node(node) => ElementSet {
                page: page.clone(),
                nodes: vec![node],
                selector: None,
            },
            Selection::Nodes(nodes) => ElementSet {
                page: page.clone(),
                nodes,
                selector: None,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The matched nodes, in document order for CSS-built sets
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// The CSS selector this set was built from, if any
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    /// Invoke `visitor` once per element, in order, with its index.
    /// All elements are visited; there is no short-circuit.
    pub fn each(&self, mut visitor: impl FnMut(NodeId, usize)) -> &Self {
        for (index, &node) in self.nodes.iter().enumerate() {
            visitor(node, index);
        }
        self
    }

    /// Attach `handler` to every element for `name`.
    ///
    /// Bindings accumulate and are never removed; binding twice means the
    /// handler runs twice per event.
    pub fn bind(
        &self,
        name: &str,
        handler: impl Fn(NodeId, &mut Event) + 'static,
    ) -> &Self {
        let shared = thin_events::handler(handler);
        self.each(|node, _index| {
            self.page.add_listener(node, name, shared.clone());
        })
    }

    /// Delegated binding: one listener on the document root reacts to
    /// events bubbling from descendants matching this set's selector.
    ///
    /// At event time the selector is re-run against the target's immediate
    /// parent and the target must appear in that match list, so only
    /// targets that themselves match fire the handler, and at most once
    /// per event. Elements added to the document after this call are
    /// covered; that is the point of delegating.
    ///
    /// Requires a CSS-built set. Node-built sets have no selector to
    /// re-match with, so this attaches nothing.
    pub fn live(
        &self,
        name: &str,
        handler: impl Fn(NodeId, &mut Event) + 'static,
    ) -> &Self {
        let Some(css) = self.selector.clone() else {
            tracing::debug!("live({:?}) on a set without a selector attaches nothing", name);
            return self;
        };

        let weak = self.page.downgrade();
        let user = handler;
        let root = self.page.document().tree().root();

        self.page.add_listener(
            root,
            name,
            thin_events::handler(move |_receiver, event: &mut Event| {
                let Some(page) = weak.upgrade() else {
                    return;
                };
                let target = event.target();
                let hit = {
                    let doc = page.document();
                    let tree = doc.tree();
                    match tree.parent_of(target) {
                        Some(parent) => selector::query_selector_all(tree, parent, &css)
                            .into_iter()
                            .any(|m| m == target),
                        None => false,
                    }
                };
                if hit {
                    user(target, event);
                }
            }),
        );
        self
    }
}
