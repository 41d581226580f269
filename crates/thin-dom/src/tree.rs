//! DOM Tree (arena-based allocation)
//!
//! Structural mutation goes through append_child / insert_before /
//! remove_child, which keep the sibling links consistent. The arena never
//! frees nodes; detached nodes simply become unreachable.

use crate::{Node, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node not found")]
    NotFound,
    /// Hierarchy error (e.g., inserting a node under its own descendant)
    #[error("hierarchy request error")]
    HierarchyRequest,
    /// Node is not a child of the given parent
    #[error("node is not a child of the given parent")]
    NotAChild,
    /// Operation requires an element node
    #[error("node is not an element")]
    NotAnElement,
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document root node
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_valid() {
            self.nodes.get(id.index())
        } else {
            None
        }
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_valid() {
            self.nodes.get_mut(id.index())
        } else {
            None
        }
    }

    /// Parent of a node, if attached
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Number of nodes in the arena (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.alloc(Node::comment(content.to_string()))
    }

    /// Create a detached doctype node
    pub fn create_doctype(&mut self, name: &str, public_id: &str, system_id: &str) -> NodeId {
        self.alloc(Node {
            data: crate::NodeData::Doctype {
                name: name.to_string(),
                public_id: public_id.to_string(),
                system_id: system_id.to_string(),
            },
            ..Node::document()
        })
    }

    /// Set an attribute on an element node
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: String) -> DomResult<()> {
        let elem = self
            .get_mut(id)
            .ok_or(DomError::NotFound)?
            .as_element_mut()
            .ok_or(DomError::NotAnElement)?;
        elem.set_attr(name, value);
        Ok(())
    }

    /// Get an attribute from an element node
    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.get_attr(name)
    }

    /// Tag name of an element node
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    /// Check if `ancestor` is an ancestor of `node`
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Unlink a node from its parent and siblings
    fn detach(&mut self, child: NodeId) {
        let (parent, prev, next) = {
            let n = &self.nodes[child.index()];
            (n.parent, n.prev_sibling, n.next_sibling)
        };

        if parent.is_valid() {
            if prev.is_valid() {
                self.nodes[prev.index()].next_sibling = next;
            } else {
                self.nodes[parent.index()].first_child = next;
            }
            if next.is_valid() {
                self.nodes[next.index()].prev_sibling = prev;
            } else {
                self.nodes[parent.index()].last_child = prev;
            }
        }

        let n = &mut self.nodes[child.index()];
        n.parent = NodeId::NONE;
        n.prev_sibling = NodeId::NONE;
        n.next_sibling = NodeId::NONE;
    }

    /// Append a child node, detaching it from any previous parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        if parent == child || self.is_ancestor_of(child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let c = &mut self.nodes[child.index()];
            c.parent = parent;
            c.prev_sibling = last;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;

        Ok(child)
    }

    /// Insert before a reference node; `None` appends
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        ref_child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        let Some(anchor) = ref_child else {
            return self.append_child(parent, new_child);
        };

        if self.get(parent).is_none() || self.get(new_child).is_none() {
            return Err(DomError::NotFound);
        }
        if self.get(anchor).map(|n| n.parent) != Some(parent) {
            return Err(DomError::NotAChild);
        }
        if parent == new_child || self.is_ancestor_of(new_child, parent) {
            return Err(DomError::HierarchyRequest);
        }

        self.detach(new_child);

        let prev = self.nodes[anchor.index()].prev_sibling;
        {
            let c = &mut self.nodes[new_child.index()];
            c.parent = parent;
            c.prev_sibling = prev;
            c.next_sibling = anchor;
        }
        self.nodes[anchor.index()].prev_sibling = new_child;
        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = new_child;
        } else {
            self.nodes[parent.index()].first_child = new_child;
        }

        Ok(new_child)
    }

    /// Remove a child node
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return Err(DomError::NotFound);
        }
        if self.nodes[child.index()].parent != parent {
            return Err(DomError::NotAChild);
        }
        self.detach(child);
        Ok(child)
    }

    /// Iterate direct children in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Children {
            tree: self,
            next: first,
        }
    }

    /// Iterate ancestors from parent up to the root
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let parent = self.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE);
        Ancestors {
            tree: self,
            next: parent,
        }
    }

    /// Iterate the subtree below `start` in document (pre-order) order,
    /// excluding `start` itself
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        let first = self.get(start).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        Descendants {
            tree: self,
            start,
            next: first,
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let cur = self.next;
        self.next = self
            .tree
            .get(cur)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(cur)
    }
}

/// Iterator over ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let cur = self.next;
        self.next = self
            .tree
            .get(cur)
            .map(|n| n.parent)
            .unwrap_or(NodeId::NONE);
        Some(cur)
    }
}

/// Pre-order subtree iterator
pub struct Descendants<'a> {
    tree: &'a DomTree,
    start: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let cur = self.next;
        let node = self.tree.get(cur)?;

        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            // climb until a next sibling exists, stopping at the subtree root
            let mut at = cur;
            loop {
                let Some(n) = self.tree.get(at) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                if !n.parent.is_valid() || n.parent == self.start {
                    break NodeId::NONE;
                }
                at = n.parent;
            }
        };

        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (DomTree, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let parent = tree.create_element("ul");
        let a = tree.create_element("li");
        let b = tree.create_element("li");
        tree.append_child(tree.root(), parent).unwrap();
        tree.append_child(parent, a).unwrap();
        tree.append_child(parent, b).unwrap();
        (tree, parent, a, b)
    }

    #[test]
    fn test_append_links_siblings() {
        let (tree, parent, a, b) = sample();

        let kids: Vec<_> = tree.children(parent).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.get(a).unwrap().next_sibling, b);
        assert_eq!(tree.get(b).unwrap().prev_sibling, a);
        assert_eq!(tree.get(parent).unwrap().first_child, a);
        assert_eq!(tree.get(parent).unwrap().last_child, b);
    }

    #[test]
    fn test_insert_before_orders_children() {
        let (mut tree, parent, a, _b) = sample();
        let c = tree.create_element("li");
        tree.insert_before(parent, c, Some(a)).unwrap();

        let kids: Vec<_> = tree.children(parent).collect();
        assert_eq!(kids[0], c);
        assert_eq!(tree.get(parent).unwrap().first_child, c);
    }

    #[test]
    fn test_remove_child_detaches() {
        let (mut tree, parent, a, b) = sample();
        tree.remove_child(parent, a).unwrap();

        let kids: Vec<_> = tree.children(parent).collect();
        assert_eq!(kids, vec![b]);
        assert!(!tree.get(a).unwrap().parent.is_valid());
    }

    #[test]
    fn test_remove_not_a_child() {
        let (mut tree, _parent, a, _b) = sample();
        let stranger = tree.create_element("div");
        assert_eq!(tree.remove_child(a, stranger), Err(DomError::NotAChild));
    }

    #[test]
    fn test_append_ancestor_is_hierarchy_error() {
        let (mut tree, parent, a, _b) = sample();
        assert_eq!(tree.append_child(a, parent), Err(DomError::HierarchyRequest));
        assert_eq!(tree.append_child(a, a), Err(DomError::HierarchyRequest));
    }

    #[test]
    fn test_reappend_moves_node() {
        let (mut tree, parent, a, b) = sample();
        let other = tree.create_element("ol");
        tree.append_child(tree.root(), other).unwrap();
        tree.append_child(other, a).unwrap();

        assert_eq!(tree.children(parent).collect::<Vec<_>>(), vec![b]);
        assert_eq!(tree.children(other).collect::<Vec<_>>(), vec![a]);
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let p = tree.create_element("p");
        let span = tree.create_element("span");
        let em = tree.create_element("em");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, p).unwrap();
        tree.append_child(p, span).unwrap();
        tree.append_child(div, em).unwrap();

        let order: Vec<_> = tree.descendants(tree.root()).collect();
        assert_eq!(order, vec![div, p, span, em]);

        let scoped: Vec<_> = tree.descendants(div).collect();
        assert_eq!(scoped, vec![p, span, em]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (tree, parent, a, _b) = sample();
        let chain: Vec<_> = tree.ancestors(a).collect();
        assert_eq!(chain, vec![parent, tree.root()]);
    }
}
