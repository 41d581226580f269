//! HTML5 Parser implementation
//!
//! Uses html5ever's built-in RcDom and converts to the arena DOM.
//! This is simpler and more reliable than implementing TreeSink directly.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use thin_dom::{Document, DomTree, NodeId};

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())
            .expect("reading from an in-memory byte slice cannot fail");

        let mut document = Document::empty(url);
        convert_node(&dom.document, document.tree_mut(), NodeId::ROOT);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert an RcDom node into the arena, attached under `parent`
fn convert_node(handle: &Handle, tree: &mut DomTree, parent: NodeId) {
    match &handle.data {
        RcNodeData::Document => {
            for child in handle.children.borrow().iter() {
                convert_node(child, tree, parent);
            }
        }
        RcNodeData::Doctype {
            name,
            public_id,
            system_id,
        } => {
            let id = tree.create_doctype(name, public_id, system_id);
            let _ = tree.append_child(parent, id);
        }
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            // whitespace-only runs between tags carry no content
            if !text.trim().is_empty() {
                let id = tree.create_text(&text);
                let _ = tree.append_child(parent, id);
            }
        }
        RcNodeData::Comment { contents } => {
            let id = tree.create_comment(contents);
            let _ = tree.append_child(parent, id);
        }
        RcNodeData::Element { name, attrs, .. } => {
            let id = tree.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                let _ = tree.set_attr(id, &attr.name.local, attr.value.to_string());
            }
            let _ = tree.append_child(parent, id);

            for child in handle.children.borrow().iter() {
                convert_node(child, tree, id);
            }
        }
        RcNodeData::ProcessingInstruction { .. } => {}
    }
}
