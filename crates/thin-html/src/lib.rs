//! thin-html - HTML5 parser
//!
//! Parses HTML into thin-dom documents using html5ever. Parsing is total:
//! malformed input still produces a tree via html5ever's error recovery.

mod parser;

pub use parser::HtmlParser;
pub use thin_dom::Document;

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> Document {
    HtmlParser::new().parse(html)
}
