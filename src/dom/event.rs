//! DOM events and handler properties

use std::fmt;
use std::rc::Rc;

use super::NodeId;

/// Prefix turning an event type into its handler property (`click` → `onclick`)
pub const HANDLER_PROPERTY_PREFIX: &str = "on";

/// Event delivered to handler properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event type without the `on` prefix (e.g. `click`, `input`)
    pub event_type: String,
    /// Node the event was dispatched on
    pub target: NodeId,
    /// Node whose handler is currently running (changes while bubbling)
    pub current_target: NodeId,
    /// Form-control value of the target at dispatch time (`e.target.value`)
    pub target_value: String,
}

/// Handler stored in an `on<type>` property slot
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler(..)")
    }
}

/// Handler property name for an event type
pub fn handler_property(event_type: &str) -> String {
    format!("{HANDLER_PROPERTY_PREFIX}{event_type}")
}
