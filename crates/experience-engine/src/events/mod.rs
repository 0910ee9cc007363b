//! Namespaced publish/subscribe.
//!
//! Every framework component owns an [`EventHub`] and publishes its state
//! changes through it (`"resize"`, `"tick"`, `"ready"`, …). Consumers register
//! callbacks by name pattern and can later remove them per event or per
//! namespace.
//!
//! Pattern grammar:
//! - tokens are separated by spaces, commas or slashes
//! - each token is `event[.namespace]`
//! - a missing namespace means [`BASE_NAMESPACE`]
//! - `.namespace` alone addresses a whole namespace (only meaningful for `off`)

mod error;
mod hub;
mod name;

pub use error::EventError;
pub use hub::{Callback, EventHub, EventName};
pub use name::{resolve_names, EventToken, BASE_NAMESPACE};
