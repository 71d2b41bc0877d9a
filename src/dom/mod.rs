//! Host DOM - in-memory tree the compiler mutates in place
//!
//! - `node`: node ids, kinds and attributes
//! - `document`: arena, content accessors, handler properties, dispatch
//! - `markup`: lenient fragment parser and escaping
//! - `selector`: CSS-style lookup of host elements
//! - `event`: events and `on<type>` handler values

mod document;
mod event;
pub mod markup;
mod node;
mod selector;

pub use document::Document;
pub use event::{handler_property, Event, EventHandler, HANDLER_PROPERTY_PREFIX};
pub use node::{Attribute, NodeId, NodeType};
pub use selector::SelectorList;
