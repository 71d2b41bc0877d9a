//! Scripted interactions replayed against a compiled template
//!
//! Grammar (one step per `--step`):
//! - `set:<expr>=<value>`        instance write; value parsed as JSON, else text
//! - `input:<selector>=<text>`   type into a control (fires `input`)
//! - `event:<selector>=<type>`   dispatch an event (bubbles)
//!
//! Selectors in steps cannot contain `=`; the first `=` ends the target.

use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::compiler::Compiler;
use crate::error::{KvueError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Set { expression: String, value: Value },
    Input { selector: String, text: String },
    Event { selector: String, event_type: String },
}

impl FromStr for Step {
    type Err = KvueError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || KvueError::InvalidStep { step: s.to_string() };
        let (action, rest) = s.split_once(':').ok_or_else(invalid)?;
        let (target, payload) = rest.split_once('=').ok_or_else(invalid)?;
        let target = target.trim();
        if target.is_empty() {
            return Err(invalid());
        }

        match action.trim() {
            "set" => Ok(Step::Set {
                expression: target.to_string(),
                value: serde_json::from_str(payload)
                    .unwrap_or_else(|_| Value::String(payload.to_string())),
            }),
            "input" => Ok(Step::Input {
                selector: target.to_string(),
                text: payload.to_string(),
            }),
            "event" if !payload.trim().is_empty() => Ok(Step::Event {
                selector: target.to_string(),
                event_type: payload.trim().to_string(),
            }),
            _ => Err(invalid()),
        }
    }
}

impl Step {
    /// Run the step; selectors are resolved against the whole document
    pub fn apply(&self, compiler: &Compiler) -> Result<()> {
        let document = compiler.document();
        let locate = |selector: &str| {
            document
                .query_selector(selector)?
                .ok_or_else(|| KvueError::NodeNotFound {
                    selector: selector.to_string(),
                })
        };

        match self {
            Step::Set { expression, value } => {
                let notified = compiler.instance().set(expression, value.clone());
                debug!(expression = %expression, notified, "step: set");
            }
            Step::Input { selector, text } => {
                let node = locate(selector)?;
                let handlers = document.input_value(node, text);
                debug!(selector = %selector, handlers, "step: input");
            }
            Step::Event {
                selector,
                event_type,
            } => {
                let node = locate(selector)?;
                let handlers = document.dispatch_event(node, event_type);
                debug!(selector = %selector, event = %event_type, handlers, "step: event");
            }
        }
        Ok(())
    }
}
