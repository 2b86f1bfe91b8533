//! In-memory signal (behavior-subject style).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, mpsc};

use crate::signal::{Registry, Signal, SubscriberId, Subscription};

#[derive(Debug)]
pub enum InMemorySignalError {
    /// `set` failed due to internal lock poisoning.
    Poisoned,
}

/// In-memory observable value.
///
/// - No IO / no async
/// - Replays the current value to each new subscriber
/// - Dead subscribers (receiver dropped without releasing) are pruned on `set`
#[derive(Debug)]
pub struct InMemorySignal<T> {
    current: Mutex<T>,
    subscribers: Arc<Registry<T>>,
    next_id: AtomicU64,
}

impl<T> InMemorySignal<T> {
    pub fn new(initial: T) -> Self {
        Self {
            current: Mutex::new(initial),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T: Default> Default for InMemorySignal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Signal<T> for InMemorySignal<T>
where
    T: Clone + Send + 'static,
{
    type Error = InMemorySignalError;

    fn get(&self) -> T {
        self.current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, value: T) -> Result<(), Self::Error> {
        // Lock order: current, then subscribers (same as `subscribe`).
        let mut current = self
            .current
            .lock()
            .map_err(|_| InMemorySignalError::Poisoned)?;
        *current = value.clone();

        let mut subs = self
            .subscribers
            .lock()
            .map_err(|_| InMemorySignalError::Poisoned)?;
        subs.retain(|(_, tx)| tx.send(value.clone()).is_ok());

        Ok(())
    }

    fn subscribe(&self) -> Subscription<T> {
        let current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let id = SubscriberId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel();

        // The receiver is still local, so this send cannot fail.
        let _ = tx.send(current.clone());

        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, tx));
        tracing::trace!(subscriber = %id, "signal subscription opened");

        Subscription::new(id, rx, Arc::downgrade(&self.subscribers))
    }
}
