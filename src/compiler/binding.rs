//! Binding installation - initial write plus a standing subscription
//!
//! This is the only place subscriptions are created. Each call to
//! [`Binder::bind`] yields exactly one subscription for its
//! (node, expression, kind) triple.

use std::rc::Rc;

use tracing::debug;

use super::directive::DirectiveKind;
use super::handlers::DirectiveRegistry;
use crate::dom::{Document, NodeId};
use crate::reactive::{Instance, Subscription};

/// Context handed to directive handlers during a compile pass
pub struct Binder<'a> {
    document: &'a Rc<Document>,
    instance: &'a Rc<Instance>,
    registry: &'a DirectiveRegistry,
}

impl<'a> Binder<'a> {
    pub fn new(
        document: &'a Rc<Document>,
        instance: &'a Rc<Instance>,
        registry: &'a DirectiveRegistry,
    ) -> Self {
        Self {
            document,
            instance,
            registry,
        }
    }

    pub fn document(&self) -> &Rc<Document> {
        self.document
    }

    pub fn instance(&self) -> &Rc<Instance> {
        self.instance
    }

    /// Write the current value of `expression` into `node`, then keep it
    /// written on every change
    ///
    /// When the registry has no updater for `kind` both the initial and all
    /// later writes are no-ops, but the subscription is still registered.
    pub fn bind(&self, node: NodeId, expression: &str, kind: DirectiveKind) {
        let updater = self.registry.get(kind);
        if let Some(updater) = &updater {
            updater.update(self.document, node, &self.instance.get(expression));
        }

        let document = Rc::clone(self.document);
        Subscription::new(self.instance, expression, move |value| {
            if let Some(updater) = &updater {
                updater.update(&document, node, value);
            }
        });

        debug!(node = node.index(), expression, %kind, "binding installed");
    }
}
