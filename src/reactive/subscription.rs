//! Change subscriptions keyed by expression name

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::Instance;

type Callback = Box<dyn Fn(&Value)>;

/// A standing request to be told about new values of one expression
///
/// Subscriptions live as long as the instance that holds them; there is no
/// unsubscribe.
pub struct Subscription {
    expression: String,
    callback: Callback,
}

impl Subscription {
    /// Register `callback` for changes of `expression` on `instance`
    pub fn new(
        instance: &Instance,
        expression: impl Into<String>,
        callback: impl Fn(&Value) + 'static,
    ) -> Rc<Self> {
        let subscription = Rc::new(Self {
            expression: expression.into(),
            callback: Box::new(callback),
        });
        instance.subscriptions().add(Rc::clone(&subscription));
        subscription
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    fn notify(&self, value: &Value) {
        (self.callback)(value)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("expression", &self.expression)
            .finish_non_exhaustive()
    }
}

/// Per-instance table of subscriptions
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
    by_expression: RefCell<FxHashMap<String, Vec<Rc<Subscription>>>>,
}

impl SubscriptionRegistry {
    fn add(&self, subscription: Rc<Subscription>) {
        self.by_expression
            .borrow_mut()
            .entry(subscription.expression.clone())
            .or_default()
            .push(subscription);
    }

    /// Invoke every subscription on `expression` with `value`
    ///
    /// The list is cloned first: callbacks may write back into the instance
    /// (and so re-enter `notify`) or register further subscriptions.
    pub(crate) fn notify(&self, expression: &str, value: &Value) -> usize {
        let subscribers = match self.by_expression.borrow().get(expression) {
            Some(list) => list.clone(),
            None => return 0,
        };
        for subscription in &subscribers {
            subscription.notify(value);
        }
        subscribers.len()
    }

    pub fn count(&self, expression: &str) -> usize {
        self.by_expression
            .borrow()
            .get(expression)
            .map_or(0, Vec::len)
    }

    pub fn total(&self) -> usize {
        self.by_expression.borrow().values().map(Vec::len).sum()
    }
}
