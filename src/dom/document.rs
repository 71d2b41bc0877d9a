//! Arena-backed mutable document
//!
//! All methods take `&self`: storage sits behind `RefCell`s whose borrows
//! never outlive a single call. Event handlers are cloned out of their slot
//! before they run, so a handler may freely mutate the document (or trigger
//! subscriptions that do).

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use tracing::trace;

use super::event::{handler_property, Event, EventHandler};
use super::markup::{self, escape_attribute, escape_text, MarkupNode};
use super::node::{is_void_element, Attribute, ElementData, NodeData, NodeId, NodeKind, NodeType};
use super::selector::SelectorList;
use crate::error::Result;

#[derive(Debug)]
pub struct Document {
    nodes: RefCell<Vec<NodeData>>,
    /// (node, `on<type>`) → handler
    handlers: RefCell<FxHashMap<(NodeId, String), EventHandler>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: RefCell::new(vec![NodeData::new(NodeKind::Document)]),
            handlers: RefCell::new(FxHashMap::default()),
        }
    }

    /// Parse markup into a fresh document
    pub fn from_markup(markup: &str) -> Self {
        let document = Self::new();
        document.append_markup(document.root(), markup::parse_fragment(markup));
        document
    }

    /// The document node
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever allocated (detached nodes included)
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    // ─────────────────────────────────────────────────────────────
    // Construction
    // ─────────────────────────────────────────────────────────────

    fn alloc(&self, kind: NodeKind) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(NodeData::new(kind));
        NodeId(nodes.len() - 1)
    }

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.alloc(NodeKind::Element(ElementData {
            tag: tag.to_ascii_lowercase(),
            ..ElementData::default()
        }))
    }

    pub fn create_text(&self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    pub fn create_comment(&self, text: &str) -> NodeId {
        self.alloc(NodeKind::Comment(text.to_string()))
    }

    /// Append `child` as last child of `parent`, detaching it first
    ///
    /// Returns false and changes nothing when `child` is `parent` itself, one
    /// of its ancestors, or the document node.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> bool {
        if child == self.root() || self.is_inclusive_ancestor(child, parent) {
            return false;
        }
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
        true
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = nodes[n.0].parent;
        }
        false
    }

    /// Remove `child` from `parent`; returns false if it was not a child
    pub fn remove_child(&self, parent: NodeId, child: NodeId) -> bool {
        if self.parent(child) != Some(parent) {
            return false;
        }
        self.detach(child);
        true
    }

    fn detach(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[node.0].parent.take() {
            nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    fn remove_all_children(&self, node: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[node.0].children);
        for child in children {
            nodes[child.0].parent = None;
        }
    }

    fn append_markup(&self, parent: NodeId, fragment: Vec<MarkupNode>) {
        for node in fragment {
            let id = match node {
                MarkupNode::Element {
                    tag,
                    attributes,
                    children,
                } => {
                    let id = self.alloc(NodeKind::Element(ElementData {
                        tag,
                        attributes,
                        value: None,
                    }));
                    self.append_markup(id, children);
                    id
                }
                MarkupNode::Text(text) => self.alloc(NodeKind::Text(text)),
                MarkupNode::Comment(text) => self.alloc(NodeKind::Comment(text)),
            };
            let mut nodes = self.nodes.borrow_mut();
            nodes[id.0].parent = Some(parent);
            nodes[parent.0].children.push(id);
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Structure
    // ─────────────────────────────────────────────────────────────

    pub fn node_type(&self, node: NodeId) -> NodeType {
        self.nodes.borrow()[node.0].kind.node_type()
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.node_type(node) == NodeType::Element
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        self.node_type(node) == NodeType::Text
    }

    /// Snapshot of the child list
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn has_children(&self, node: NodeId) -> bool {
        !self.nodes.borrow()[node.0].children.is_empty()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    /// All descendants of `node` in pre-order, excluding `node` itself
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[node.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    // ─────────────────────────────────────────────────────────────
    // Elements
    // ─────────────────────────────────────────────────────────────

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        match &self.nodes.borrow()[node.0].kind {
            NodeKind::Element(el) => Some(el.tag.clone()),
            _ => None,
        }
    }

    /// Ordered snapshot of an element's attributes (empty for non-elements)
    pub fn attributes(&self, node: NodeId) -> Vec<Attribute> {
        match &self.nodes.borrow()[node.0].kind {
            NodeKind::Element(el) => el.attributes.clone(),
            _ => Vec::new(),
        }
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match &self.nodes.borrow()[node.0].kind {
            NodeKind::Element(el) => el
                .attributes
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.clone()),
            _ => None,
        }
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element(el) = &mut self.nodes.borrow_mut()[node.0].kind {
            match el.attributes.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value.to_string(),
                None => el.attributes.push(Attribute::new(name, value)),
            }
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        if let NodeKind::Element(el) = &mut self.nodes.borrow_mut()[node.0].kind {
            el.attributes.retain(|a| a.name != name);
        }
    }

    /// Form-control value: the value property if written, else the `value` attribute
    pub fn value(&self, node: NodeId) -> String {
        match &self.nodes.borrow()[node.0].kind {
            NodeKind::Element(el) => el.value.clone().unwrap_or_else(|| {
                el.attributes
                    .iter()
                    .find(|a| a.name == "value")
                    .map(|a| a.value.clone())
                    .unwrap_or_default()
            }),
            _ => String::new(),
        }
    }

    pub fn set_value(&self, node: NodeId, value: &str) {
        if let NodeKind::Element(el) = &mut self.nodes.borrow_mut()[node.0].kind {
            el.value = Some(value.to_string());
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Content
    // ─────────────────────────────────────────────────────────────

    /// Concatenated text of all descendant text nodes (`textContent`)
    pub fn text_content(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        match &nodes[node.0].kind {
            NodeKind::Text(text) | NodeKind::Comment(text) => text.clone(),
            _ => {
                let mut out = String::new();
                collect_text(&nodes, node, &mut out);
                out
            }
        }
    }

    /// Replace content with plain text (`textContent = ...`)
    ///
    /// On elements all children are replaced by a single text node, or by
    /// nothing when `text` is empty. On text and comment nodes the data is
    /// replaced in place.
    pub fn set_text_content(&self, node: NodeId, text: &str) {
        {
            let mut nodes = self.nodes.borrow_mut();
            match &mut nodes[node.0].kind {
                NodeKind::Text(data) | NodeKind::Comment(data) => {
                    *data = text.to_string();
                    return;
                }
                NodeKind::Element(_) | NodeKind::Document => {}
            }
        }
        self.remove_all_children(node);
        if !text.is_empty() {
            let child = self.create_text(text);
            self.append_child(node, child);
        }
    }

    /// Serialized children (`innerHTML`)
    pub fn inner_html(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        for &child in &nodes[node.0].children {
            serialize(&nodes, child, &mut out);
        }
        out
    }

    /// Serialized node including itself (`outerHTML`)
    pub fn outer_html(&self, node: NodeId) -> String {
        let nodes = self.nodes.borrow();
        let mut out = String::new();
        serialize(&nodes, node, &mut out);
        out
    }

    /// Replace children with parsed markup (`innerHTML = ...`)
    ///
    /// No sanitization is performed. Text, comment and void element nodes
    /// cannot hold children and are left unchanged.
    pub fn set_inner_html(&self, node: NodeId, markup: &str) {
        let accepts_children = match self.node_type(node) {
            NodeType::Element => !self.tag_name(node).is_some_and(|tag| is_void_element(&tag)),
            NodeType::Document => true,
            NodeType::Text | NodeType::Comment => false,
        };
        if !accepts_children {
            return;
        }
        self.remove_all_children(node);
        self.append_markup(node, markup::parse_fragment(markup));
    }

    // ─────────────────────────────────────────────────────────────
    // Events
    // ─────────────────────────────────────────────────────────────

    /// Assign an `on<type>` handler property, replacing any previous one
    pub fn set_event_handler(&self, node: NodeId, property: &str, handler: EventHandler) {
        self.handlers
            .borrow_mut()
            .insert((node, property.to_string()), handler);
    }

    pub fn event_handler(&self, node: NodeId, property: &str) -> Option<EventHandler> {
        self.handlers
            .borrow()
            .get(&(node, property.to_string()))
            .cloned()
    }

    /// Dispatch an event at `target`, bubbling through its ancestors
    ///
    /// Returns the number of handlers invoked.
    pub fn dispatch_event(&self, target: NodeId, event_type: &str) -> usize {
        let property = handler_property(event_type);
        let mut event = Event {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            target_value: self.value(target),
        };

        let mut invoked = 0;
        let mut current = Some(target);
        while let Some(node) = current {
            // Handler is cloned out so no borrow is held while it runs
            if let Some(handler) = self.event_handler(node, &property) {
                event.current_target = node;
                trace!(node = node.index(), event = event_type, "invoking handler");
                handler.call(&event);
                invoked += 1;
            }
            current = self.parent(node);
        }
        invoked
    }

    /// Simulate user typing: write the control value, then fire `input`
    pub fn input_value(&self, node: NodeId, value: &str) -> usize {
        self.set_value(node, value);
        self.dispatch_event(node, "input")
    }

    // ─────────────────────────────────────────────────────────────
    // Selectors
    // ─────────────────────────────────────────────────────────────

    /// First element matching `selector`, in document order
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(self
            .descendants(self.root())
            .into_iter()
            .find(|&node| selector.matches(self, node)))
    }

    /// All elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        Ok(self
            .descendants(self.root())
            .into_iter()
            .filter(|&node| selector.matches(self, node))
            .collect())
    }
}

fn collect_text(nodes: &[NodeData], node: NodeId, out: &mut String) {
    for &child in &nodes[node.0].children {
        match &nodes[child.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element(_) | NodeKind::Document => collect_text(nodes, child, out),
            NodeKind::Comment(_) => {}
        }
    }
}

fn serialize(nodes: &[NodeData], node: NodeId, out: &mut String) {
    let data = &nodes[node.0];
    match &data.kind {
        NodeKind::Document => {
            for &child in &data.children {
                serialize(nodes, child, out);
            }
        }
        NodeKind::Text(text) => {
            let raw = data
                .parent
                .and_then(|p| match &nodes[p.0].kind {
                    NodeKind::Element(el) => Some(markup::is_raw_text_element(&el.tag)),
                    _ => None,
                })
                .unwrap_or(false);
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for attr in &el.attributes {
                out.push(' ');
                out.push_str(&attr.name);
                if !attr.value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(&attr.value));
                    out.push('"');
                }
            }
            out.push('>');
            if is_void_element(&el.tag) {
                return;
            }
            for &child in &data.children {
                serialize(nodes, child, out);
            }
            out.push_str("</");
            out.push_str(&el.tag);
            out.push('>');
        }
    }
}
