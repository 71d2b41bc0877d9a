//! Template compiler - one pass over the host tree, wiring every binding
//!
//! ```text
//! Compiler::mount(selector)
//!        ↓
//!   compile(root)  ── pre-order, depth-first over root's descendants
//!        ↓
//!   classify(node)
//!    ├─ Element        → attributes: k-* → DirectiveRegistry → Directive::install
//!    │                               @*  → method → on<event> handler
//!    ├─ Interpolation  → Binder::bind(node, expr, text)
//!    └─ Other          → (nothing)
//!        ↓
//!   recurse into children (read after the node was processed)
//! ```
//!
//! Every `Directive::install` and interpolation ends in [`Binder::bind`],
//! the single point where subscriptions are created.

mod binding;
mod classify;
mod directive;
mod handlers;
mod report;

use std::rc::Rc;

use tracing::{debug, trace, warn};

pub use binding::Binder;
pub use classify::{classify, match_interpolation, NodeClass};
pub use directive::{classify_attribute, AttributeClass, DirectiveKind};
pub use handlers::{Directive, DirectiveRegistry, HtmlDirective, ModelDirective, TextDirective};
pub use report::CompileReport;

use crate::config::{CompilerConfig, MissingMethodPolicy};
use crate::dom::{Document, EventHandler, NodeId};
use crate::error::{KvueError, Result};
use crate::reactive::Instance;

/// A compiled template: the host tree and instance it bound, plus a report
///
/// Bindings outlive the compiler; dropping it does not unbind anything.
#[derive(Debug)]
pub struct Compiler {
    document: Rc<Document>,
    instance: Rc<Instance>,
    config: CompilerConfig,
    registry: DirectiveRegistry,
    root: Option<NodeId>,
    report: CompileReport,
}

impl Compiler {
    /// Compile the element matched by `selector` with default settings
    ///
    /// A selector that matches nothing is not an error: the result has no
    /// root and installed nothing.
    pub fn new(selector: &str, document: Rc<Document>, instance: Rc<Instance>) -> Result<Self> {
        Self::builder(document, instance).mount(selector)
    }

    /// Like [`Compiler::new`], with explicit prefixes and missing-method policy
    pub fn with_config(
        selector: &str,
        document: Rc<Document>,
        instance: Rc<Instance>,
        config: CompilerConfig,
    ) -> Result<Self> {
        Self::builder(document, instance).config(config).mount(selector)
    }

    pub fn builder(document: Rc<Document>, instance: Rc<Instance>) -> CompilerBuilder {
        CompilerBuilder {
            document,
            instance,
            config: CompilerConfig::default(),
            registry: DirectiveRegistry::default(),
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn report(&self) -> &CompileReport {
        &self.report
    }

    pub fn document(&self) -> &Rc<Document> {
        &self.document
    }

    pub fn instance(&self) -> &Rc<Instance> {
        &self.instance
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    fn compile(&mut self, parent: NodeId) -> Result<()> {
        for node in self.document.children(parent) {
            self.report.nodes_visited += 1;
            match classify(&self.document, node) {
                NodeClass::Element => self.compile_element(node)?,
                NodeClass::Interpolation { expression } => self.compile_text(node, &expression),
                NodeClass::Other => trace!(node = node.index(), "not bindable"),
            }

            // Plain containers still need their descendants visited
            if self.document.has_children(node) {
                self.compile(node)?;
            }
        }
        Ok(())
    }

    fn compile_text(&mut self, node: NodeId, expression: &str) {
        Binder::new(&self.document, &self.instance, &self.registry).bind(
            node,
            expression,
            DirectiveKind::Text,
        );
        self.report.interpolations += 1;
    }

    fn compile_element(&mut self, node: NodeId) -> Result<()> {
        for attr in self.document.attributes(node) {
            match classify_attribute(&attr.name, &self.config) {
                AttributeClass::Directive(name) => {
                    let directive = DirectiveKind::from_name(name).and_then(|k| self.registry.get(k));
                    match directive {
                        Some(directive) => {
                            let binder = Binder::new(&self.document, &self.instance, &self.registry);
                            directive.install(&binder, node, &attr.value);
                            self.report.record(directive.kind());
                        }
                        None => {
                            debug!(attribute = %attr.name, "no handler for directive, ignored");
                            self.report.ignored_directives += 1;
                        }
                    }
                }
                AttributeClass::Event(property) => self.compile_event(node, &property, &attr.value)?,
                AttributeClass::Plain => {}
            }
        }
        Ok(())
    }

    /// Assign `instance.methods[method]` as the node's `property` handler,
    /// run with the instance as its context
    fn compile_event(&mut self, node: NodeId, property: &str, method_name: &str) -> Result<()> {
        let Some(method) = self.instance.method(method_name) else {
            return match self.config.on_missing_method {
                MissingMethodPolicy::Abort => Err(KvueError::UnknownMethod {
                    method: method_name.to_string(),
                    event: property.to_string(),
                }),
                MissingMethodPolicy::Warn => {
                    warn!(method = method_name, event = property, "event bound to unknown method, skipped");
                    self.report.skipped_events += 1;
                    Ok(())
                }
            };
        };

        let vm = Rc::downgrade(&self.instance);
        self.document.set_event_handler(
            node,
            property,
            EventHandler::new(move |event| match vm.upgrade() {
                Some(vm) => method(&vm, event),
                None => trace!("event after instance dropped"),
            }),
        );
        debug!(node = node.index(), event = property, method = method_name, "event bound");
        self.report.event_bindings += 1;
        Ok(())
    }
}

/// Compiler settings applied before mounting
#[derive(Debug)]
pub struct CompilerBuilder {
    document: Rc<Document>,
    instance: Rc<Instance>,
    config: CompilerConfig,
    registry: DirectiveRegistry,
}

impl CompilerBuilder {
    pub fn config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(mut self, registry: DirectiveRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Locate the root element and run the compile pass
    pub fn mount(self, selector: &str) -> Result<Compiler> {
        self.config.validate()?;
        let root = self.document.query_selector(selector)?;

        let mut compiler = Compiler {
            document: self.document,
            instance: self.instance,
            config: self.config,
            registry: self.registry,
            root,
            report: CompileReport::default(),
        };

        match root {
            Some(root) => {
                compiler.report.root_found = true;
                compiler.compile(root)?;
                debug!(
                    selector,
                    subscriptions = compiler.report.subscriptions(),
                    events = compiler.report.event_bindings,
                    "compile finished"
                );
            }
            None => debug!(selector, "root not found, compile skipped"),
        }

        Ok(compiler)
    }
}
