//! `taskdeck-events`: observable values with deterministic subscriptions.
//!
//! A [`Signal`] always has a current value. Subscribers receive that value
//! immediately, then every value set afterwards, in order. Dropping a
//! [`Subscription`] detaches it from the signal at once.

pub mod in_memory_signal;
pub mod signal;

pub use in_memory_signal::{InMemorySignal, InMemorySignalError};
pub use signal::{Signal, SubscriberId, Subscription};
