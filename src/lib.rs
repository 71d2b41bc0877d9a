//! KVue - declarative template compiler for a minimal reactive runtime
//!
//! Walks a host DOM subtree once, turning `k-*` directive attributes,
//! `@event` bindings and `{{expr}}` text into live bindings between an
//! [`Instance`] and the DOM.
//!
//! ```
//! use std::rc::Rc;
//! use kvue::{Compiler, Document, Instance};
//! use serde_json::json;
//!
//! let document = Rc::new(Document::from_markup(r#"<div id="app"><span>{{count}}</span></div>"#));
//! let vm = Instance::builder().data("count", 0).build();
//! let compiler = Compiler::new("#app", Rc::clone(&document), Rc::clone(&vm)).unwrap();
//!
//! vm.set("count", json!(3));
//! assert_eq!(document.text_content(compiler.root().unwrap()), "3");
//! ```

pub mod compiler;
pub mod config;
pub mod dom;
pub mod error;
pub mod reactive;
pub mod steps;

pub use compiler::{CompileReport, Compiler, CompilerBuilder, DirectiveKind, DirectiveRegistry};
pub use config::{CompilerConfig, MissingMethodPolicy};
pub use dom::{Document, Event, EventHandler, NodeId};
pub use error::{FixSuggestion, KvueError, Result};
pub use reactive::{Instance, Subscription};
pub use steps::Step;
