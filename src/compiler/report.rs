//! Per-compile counters

use serde::Serialize;

use super::directive::DirectiveKind;

/// What a compile pass installed and what it passed over
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompileReport {
    /// Whether the root selector matched
    pub root_found: bool,
    /// Nodes visited by the walk (root excluded)
    pub nodes_visited: usize,
    pub text_bindings: usize,
    pub html_bindings: usize,
    pub model_bindings: usize,
    pub interpolations: usize,
    pub event_bindings: usize,
    /// Directive attributes with no registered handler
    pub ignored_directives: usize,
    /// Event bindings dropped under the `warn` policy
    pub skipped_events: usize,
}

impl CompileReport {
    pub(crate) fn record(&mut self, kind: DirectiveKind) {
        match kind {
            DirectiveKind::Text => self.text_bindings += 1,
            DirectiveKind::Html => self.html_bindings += 1,
            DirectiveKind::Model => self.model_bindings += 1,
        }
    }

    /// Subscriptions created: one per directive binding and interpolation
    pub fn subscriptions(&self) -> usize {
        self.text_bindings + self.html_bindings + self.model_bindings + self.interpolations
    }
}
