//! Instance - observable data plus callable methods

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use tracing::trace;

use super::subscription::SubscriptionRegistry;
use crate::dom::Event;
use crate::error::{KvueError, Result};

/// Method callable from an event binding, run with the instance as context
pub type Method = Rc<dyn Fn(&Instance, &Event)>;

/// State-and-behavior object a template is compiled against
///
/// Writes through [`Instance::set`] notify every [`Subscription`](super::Subscription)
/// on the written expression, synchronously, when the value changed.
pub struct Instance {
    data: RefCell<FxHashMap<String, Value>>,
    methods: FxHashMap<String, Method>,
    subscriptions: SubscriptionRegistry,
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut methods: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        methods.sort_unstable();
        f.debug_struct("Instance")
            .field("data", &self.data.borrow())
            .field("methods", &methods)
            .field("subscriptions", &self.subscriptions.total())
            .finish()
    }
}

impl Instance {
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::default()
    }

    /// Instance with data taken from a JSON object and no methods
    pub fn from_data(data: Value) -> Result<Rc<Self>> {
        Ok(Self::builder().data_object(data)?.build())
    }

    /// Current value of `expression` (`Null` when never set)
    pub fn get(&self, expression: &str) -> Value {
        self.data
            .borrow()
            .get(expression)
            .cloned()
            .unwrap_or(Value::Null)
    }

    /// Write `expression`, notifying subscribers if the value changed
    ///
    /// Returns the number of subscriptions notified.
    pub fn set(&self, expression: &str, value: Value) -> usize {
        {
            let mut data = self.data.borrow_mut();
            if data.get(expression) == Some(&value) {
                return 0;
            }
            data.insert(expression.to_string(), value.clone());
        }
        let notified = self.subscriptions.notify(expression, &value);
        trace!(expression, notified, "instance write");
        notified
    }

    pub fn method(&self, name: &str) -> Option<Method> {
        self.methods.get(name).cloned()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Copy of all data as a JSON object
    pub fn data_snapshot(&self) -> Value {
        let data = self.data.borrow();
        let mut keys: Vec<&String> = data.keys().collect();
        keys.sort();
        Value::Object(
            keys.into_iter()
                .map(|k| (k.clone(), data[k].clone()))
                .collect::<Map<String, Value>>(),
        )
    }

    pub fn subscription_count(&self, expression: &str) -> usize {
        self.subscriptions.count(expression)
    }

    pub(crate) fn subscriptions(&self) -> &SubscriptionRegistry {
        &self.subscriptions
    }
}

#[derive(Default)]
pub struct InstanceBuilder {
    data: FxHashMap<String, Value>,
    methods: FxHashMap<String, Method>,
}

impl InstanceBuilder {
    pub fn data(mut self, expression: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(expression.into(), value.into());
        self
    }

    /// Merge every key of a JSON object into the data
    pub fn data_object(mut self, data: Value) -> Result<Self> {
        match data {
            Value::Object(map) => {
                self.data.extend(map);
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(KvueError::InvalidData {
                reason: format!("expected an object, got {}", json_type(&other)),
            }),
        }
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        method: impl Fn(&Instance, &Event) + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Rc::new(method));
        self
    }

    pub fn build(self) -> Rc<Instance> {
        Rc::new(Instance {
            data: RefCell::new(self.data),
            methods: self.methods,
            subscriptions: SubscriptionRegistry::default(),
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
