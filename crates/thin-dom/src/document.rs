//! Document - High-level document API

use crate::{DomTree, NodeId};

/// Document lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    /// Still parsing; unsafe to query or mutate
    Loading,
    /// Structure is available
    Interactive,
    /// Fully loaded, subresources included
    Complete,
}

/// HTML Document
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
    /// Lifecycle state, advances monotonically
    ready_state: ReadyState,
}

impl Document {
    /// Create a new document with the html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
            ready_state: ReadyState::Loading,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            ready_state: ReadyState::Loading,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Current lifecycle state
    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Advance the lifecycle state; regressions are ignored.
    /// Returns whether the state changed.
    pub fn advance_ready_state(&mut self, state: ReadyState) -> bool {
        if state <= self.ready_state {
            return false;
        }
        tracing::debug!("Document {} ready state -> {:?}", self.url, state);
        self.ready_state = state;
        true
    }

    /// Locate html/head/body after external tree construction
    pub fn finalize(&mut self) {
        let ids: Vec<NodeId> = self.tree.descendants(self.tree.root()).collect();
        for id in ids {
            let Some(elem) = self.tree.get(id).and_then(|n| n.as_element()) else {
                continue;
            };
            match elem.tag.as_str() {
                "html" if !self.html_element.is_valid() => self.html_element = id,
                "head" if !self.head_element.is_valid() => self.head_element = id,
                "body" if !self.body_element.is_valid() => self.body_element = id,
                _ => {}
            }
        }
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.descendants(self.tree.root()).find(|&n| {
            self.tree
                .get(n)
                .and_then(|node| node.as_element())
                .is_some_and(|e| e.id.as_deref() == Some(id))
        })
    }

    /// Trial mutation used by the readiness poll: append and remove a
    /// scratch node. Fails while the document is still loading.
    pub fn mutation_probe(&mut self) -> bool {
        if self.ready_state == ReadyState::Loading {
            return false;
        }
        let root = self.tree.root();
        let scratch = self.tree.create_text("");
        self.tree.append_child(root, scratch).is_ok()
            && self.tree.remove_child(root, scratch).is_ok()
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_skeleton() {
        let doc = Document::new("about:blank");
        assert!(doc.document_element().is_valid());
        assert_eq!(doc.tree().tag(doc.head()), Some("head"));
        assert_eq!(doc.tree().tag(doc.body()), Some("body"));
    }

    #[test]
    fn test_ready_state_is_monotonic() {
        let mut doc = Document::default();
        assert!(doc.advance_ready_state(ReadyState::Interactive));
        assert!(!doc.advance_ready_state(ReadyState::Loading));
        assert!(doc.advance_ready_state(ReadyState::Complete));
        assert!(!doc.advance_ready_state(ReadyState::Interactive));
        assert_eq!(doc.ready_state(), ReadyState::Complete);
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::default();
        let div = doc.tree_mut().create_element("div");
        doc.tree_mut().set_attr(div, "id", "main".to_string()).unwrap();
        let body = doc.body();
        doc.tree_mut().append_child(body, div).unwrap();

        assert_eq!(doc.get_element_by_id("main"), Some(div));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_mutation_probe_fails_while_loading() {
        let mut doc = Document::default();
        assert!(!doc.mutation_probe());
        doc.advance_ready_state(ReadyState::Interactive);
        assert!(doc.mutation_probe());
    }

    #[test]
    fn test_finalize_locates_skeleton() {
        let mut doc = Document::empty("about:blank");
        let html = doc.tree_mut().create_element("html");
        let body = doc.tree_mut().create_element("body");
        let root = doc.tree().root();
        doc.tree_mut().append_child(root, html).unwrap();
        doc.tree_mut().append_child(html, body).unwrap();

        doc.finalize();
        assert_eq!(doc.document_element(), html);
        assert_eq!(doc.body(), body);
        assert!(!doc.head().is_valid());
    }
}
