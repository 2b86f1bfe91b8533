//! Observable value abstraction (mechanics only).
//!
//! A signal is a pub/sub channel that also remembers its latest value. It is
//! the shape of "who is currently signed in": late subscribers must learn the
//! current state without waiting for the next change.
//!
//! ## Delivery
//!
//! - **Replay on subscribe**: the current value is queued before `subscribe`
//!   returns.
//! - **Exactly once, in order**: every value passed to `set` after that is
//!   queued once per live subscription, in call order.
//! - **No coalescing**: setting the same value twice delivers it twice;
//!   consumers that only care about changes diff on their side.
//!
//! ## Release
//!
//! Dropping a [`Subscription`] removes its sender from the signal before
//! `drop` returns, so a disposed consumer never costs the publisher anything.

use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError, TryRecvError};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

/// Identity of one subscription within its signal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Live senders of a signal, keyed by subscriber.
pub(crate) type Registry<T> = Mutex<Vec<(SubscriberId, mpsc::Sender<T>)>>;

/// A subscription to a signal.
///
/// The first value received is the signal's value at subscription time.
///
/// ## Usage Pattern
///
/// ```ignore
/// let sub = signal.subscribe();
/// let initial = sub.try_recv()?;       // always present
/// signal.set(next)?;
/// for value in sub.drain() { render(value); }
/// drop(sub);                            // detached immediately
/// ```
///
/// ## Thread Safety
///
/// Subscriptions are designed for single-threaded consumption, like the UI
/// loop that owns them.
#[derive(Debug)]
pub struct Subscription<T> {
    id: SubscriberId,
    receiver: Receiver<T>,
    registry: Weak<Registry<T>>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(
        id: SubscriberId,
        receiver: Receiver<T>,
        registry: Weak<Registry<T>>,
    ) -> Self {
        Self {
            id,
            receiver,
            registry,
        }
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Block until the next value is available.
    pub fn recv(&self) -> Result<T, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a value without blocking.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a value.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Take every value queued so far, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.receiver.try_iter().collect()
    }

    /// Detach from the signal. Equivalent to dropping the subscription.
    pub fn unsubscribe(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut subs = registry.lock().unwrap_or_else(PoisonError::into_inner);
        subs.retain(|(id, _)| *id != self.id);
        tracing::trace!(
            subscriber = %self.id,
            remaining = subs.len(),
            "signal subscription released"
        );
    }
}

/// Observable value (current value + change notifications).
///
/// ## Design Principles
///
/// - **Always has a value**: `get` never blocks and never fails
/// - **Replay**: subscribers see the current value first
/// - **Explicit context**: signals are passed to their consumers, never
///   reached through globals
///
/// The trait requires `Send + Sync` so a host may share a signal across
/// threads, though TaskDeck drives it from a single UI loop.
pub trait Signal<T>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    /// Snapshot of the current value.
    fn get(&self) -> T;

    /// Replace the current value and notify every live subscription.
    fn set(&self, value: T) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<T>;
}

impl<T, S> Signal<T> for Arc<S>
where
    S: Signal<T> + ?Sized,
{
    type Error = S::Error;

    fn get(&self) -> T {
        (**self).get()
    }

    fn set(&self, value: T) -> Result<(), Self::Error> {
        (**self).set(value)
    }

    fn subscribe(&self) -> Subscription<T> {
        (**self).subscribe()
    }
}
