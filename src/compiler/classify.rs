//! Node classification - element, interpolation text, or neither

use std::sync::LazyLock;

use regex::Regex;

use crate::dom::{Document, NodeId, NodeType};

/// `{{...}}` anywhere in a text node; the capture is greedy, so it spans from
/// the first `{{` to the last `}}`
static INTERPOLATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*)\}\}").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeClass {
    Element,
    /// Text node carrying an interpolation, with its captured expression
    Interpolation { expression: String },
    Other,
}

pub fn classify(document: &Document, node: NodeId) -> NodeClass {
    match document.node_type(node) {
        NodeType::Element => NodeClass::Element,
        NodeType::Text => match match_interpolation(&document.text_content(node)) {
            Some(expression) => NodeClass::Interpolation {
                expression: expression.to_string(),
            },
            None => NodeClass::Other,
        },
        NodeType::Comment | NodeType::Document => NodeClass::Other,
    }
}

/// Captured expression of the interpolation in `text`, if any
///
/// Text holding several interpolations yields one capture spanning all of
/// them: `{{a}} and {{b}}` captures `a}} and {{b`.
pub fn match_interpolation(text: &str) -> Option<&str> {
    INTERPOLATION_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
