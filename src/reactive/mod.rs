//! Reactive instance - the observation system the compiler binds against
//!
//! The compiler only relies on three things from here: reading an
//! expression, writing one, and registering a [`Subscription`] that is
//! called with each new value.

mod instance;
mod subscription;
mod value;

pub use instance::{Instance, InstanceBuilder, Method};
pub use subscription::{Subscription, SubscriptionRegistry};
pub use value::{as_number, display_string};
