//! CSS selector subset
//!
//! Supports `*`, tag, `#id`, `.class`, compound forms of those
//! (`li.item#first`), and comma-separated lists. No combinators.
//!
//! Query entry points never fail: a selector the engine cannot parse
//! yields an empty match list, and matching against a non-element is
//! simply false.

use crate::{DomTree, ElementData, NodeId};

/// Simple selector for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Universal,
}

/// A sequence of simple selectors that must all match one element
#[derive(Debug, Clone)]
pub struct Compound {
    parts: Vec<SimpleSelector>,
}

impl Compound {
    fn parse(input: &str) -> Option<Self> {
        if input.is_empty() {
            return None;
        }

        let mut parts = Vec::new();
        let mut rest = input;
        let mut first = true;
        while !rest.is_empty() {
            if let Some(r) = rest.strip_prefix('*') {
                if !first {
                    return None;
                }
                parts.push(SimpleSelector::Universal);
                rest = r;
            } else if let Some(r) = rest.strip_prefix('#') {
                let (ident, r) = take_ident(r)?;
                parts.push(SimpleSelector::Id(ident));
                rest = r;
            } else if let Some(r) = rest.strip_prefix('.') {
                let (ident, r) = take_ident(r)?;
                parts.push(SimpleSelector::Class(ident));
                rest = r;
            } else {
                // a tag name is only valid in leading position
                if !first {
                    return None;
                }
                let (ident, r) = take_ident(rest)?;
                parts.push(SimpleSelector::Tag(ident.to_ascii_lowercase()));
                rest = r;
            }
            first = false;
        }

        Some(Self { parts })
    }

    fn matches(&self, elem: &ElementData) -> bool {
        self.parts.iter().all(|part| match part {
            SimpleSelector::Universal => true,
            SimpleSelector::Tag(tag) => elem.tag.eq_ignore_ascii_case(tag),
            SimpleSelector::Id(id) => elem.id.as_deref() == Some(id),
            SimpleSelector::Class(class) => elem.has_class(class),
        })
    }
}

/// Comma-separated selector alternatives
#[derive(Debug, Clone)]
pub struct SelectorList {
    compounds: Vec<Compound>,
}

impl SelectorList {
    /// Parse a selector string; None if any part is unsupported
    pub fn parse(input: &str) -> Option<Self> {
        let mut compounds = Vec::new();
        for part in input.split(',') {
            compounds.push(Compound::parse(part.trim())?);
        }
        Some(Self { compounds })
    }

    /// Check a node against the list (false for non-elements)
    pub fn matches_node(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(elem) = tree.get(id).and_then(|n| n.as_element()) else {
            return false;
        };
        self.compounds.iter().any(|c| c.matches(elem))
    }
}

fn take_ident(s: &str) -> Option<(String, &str)> {
    let end = s
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(s.len());
    if end == 0 {
        None
    } else {
        Some((s[..end].to_string(), &s[end..]))
    }
}

/// Query all elements below `root` matching `selector`, in document order.
/// Unsupported selectors yield an empty list.
pub fn query_selector_all(tree: &DomTree, root: NodeId, selector: &str) -> Vec<NodeId> {
    let Some(list) = SelectorList::parse(selector) else {
        tracing::debug!("Unsupported selector {:?}, returning no matches", selector);
        return Vec::new();
    };
    tree.descendants(root)
        .filter(|&id| list.matches_node(tree, id))
        .collect()
}

/// First element below `root` matching `selector`
pub fn query_selector(tree: &DomTree, root: NodeId, selector: &str) -> Option<NodeId> {
    let list = SelectorList::parse(selector)?;
    tree.descendants(root).find(|&id| list.matches_node(tree, id))
}

/// Check if one node matches `selector`
pub fn matches(tree: &DomTree, id: NodeId, selector: &str) -> bool {
    SelectorList::parse(selector).is_some_and(|list| list.matches_node(tree, id))
}
