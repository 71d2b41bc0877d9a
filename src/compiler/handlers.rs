//! Directive handlers and their registry
//!
//! | kind    | install                                  | update               |
//! |---------|------------------------------------------|----------------------|
//! | `text`  | bind                                     | set text content     |
//! | `html`  | bind                                     | set inner markup     |
//! | `model` | `oninput` writes back to instance + bind | nothing              |

use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::trace;

use super::binding::Binder;
use super::directive::DirectiveKind;
use crate::dom::{handler_property, Document, EventHandler, NodeId};
use crate::reactive::display_string;

/// Install + DOM-update pair for one directive kind
pub trait Directive {
    fn kind(&self) -> DirectiveKind;

    /// Wire `node` to `expression` during the compile pass
    fn install(&self, binder: &Binder<'_>, node: NodeId, expression: &str);

    /// Apply a value to `node`
    fn update(&self, document: &Document, node: NodeId, value: &Value);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextDirective;

impl Directive for TextDirective {
    fn kind(&self) -> DirectiveKind {
        DirectiveKind::Text
    }

    fn install(&self, binder: &Binder<'_>, node: NodeId, expression: &str) {
        binder.bind(node, expression, DirectiveKind::Text);
    }

    fn update(&self, document: &Document, node: NodeId, value: &Value) {
        document.set_text_content(node, &display_string(value));
    }
}

/// Inner markup replacement. Values are not sanitized.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDirective;

impl Directive for HtmlDirective {
    fn kind(&self) -> DirectiveKind {
        DirectiveKind::Html
    }

    fn install(&self, binder: &Binder<'_>, node: NodeId, expression: &str) {
        binder.bind(node, expression, DirectiveKind::Html);
    }

    fn update(&self, document: &Document, node: NodeId, value: &Value) {
        document.set_inner_html(node, &display_string(value));
    }
}

/// Two-way form value: the DOM → instance path lives in the `oninput`
/// handler, so the update side writes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelDirective;

impl Directive for ModelDirective {
    fn kind(&self) -> DirectiveKind {
        DirectiveKind::Model
    }

    fn install(&self, binder: &Binder<'_>, node: NodeId, expression: &str) {
        let vm = Rc::downgrade(binder.instance());
        let expr = expression.to_string();
        binder.document().set_event_handler(
            node,
            &handler_property("input"),
            EventHandler::new(move |event| match vm.upgrade() {
                Some(vm) => {
                    vm.set(&expr, Value::String(event.target_value.clone()));
                }
                None => trace!(expression = %expr, "input after instance dropped"),
            }),
        );

        binder.bind(node, expression, DirectiveKind::Model);
    }

    fn update(&self, _document: &Document, _node: NodeId, _value: &Value) {}
}

/// Kind → handler table, resolved once per compiler
#[derive(Clone)]
pub struct DirectiveRegistry {
    handlers: FxHashMap<DirectiveKind, Rc<dyn Directive>>,
}

impl Default for DirectiveRegistry {
    fn default() -> Self {
        Self::empty()
            .register(Rc::new(TextDirective))
            .register(Rc::new(HtmlDirective))
            .register(Rc::new(ModelDirective))
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<DirectiveKind> = self.handlers.keys().copied().collect();
        kinds.sort();
        f.debug_struct("DirectiveRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl DirectiveRegistry {
    /// Registry with no handlers; every kind is inert
    pub fn empty() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Add or replace the handler for `directive.kind()`
    pub fn register(mut self, directive: Rc<dyn Directive>) -> Self {
        self.handlers.insert(directive.kind(), directive);
        self
    }

    pub fn get(&self, kind: DirectiveKind) -> Option<Rc<dyn Directive>> {
        self.handlers.get(&kind).cloned()
    }

    pub fn contains(&self, kind: DirectiveKind) -> bool {
        self.handlers.contains_key(&kind)
    }
}
