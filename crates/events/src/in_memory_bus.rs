//! Fan-out of session events to in-process subscribers.

use std::convert::Infallible;
use std::sync::{Mutex, MutexGuard, mpsc};

use crate::bus::{EventBus, Subscription};

/// Channel-per-subscriber bus owned by one session.
///
/// Publishing never fails: a subscriber whose [`Subscription`] was dropped is
/// detached on the next publish, and a lock poisoned by a panicking reader is
/// recovered since the sender list cannot be left half-updated.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    senders: Mutex<Vec<mpsc::Sender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders().len()
    }

    fn senders(&self) -> MutexGuard<'_, Vec<mpsc::Sender<M>>> {
        self.senders.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<M: Clone> InMemoryEventBus<M> {
    /// Send `message` to every attached subscriber; returns how many got it.
    fn fan_out(&self, message: &M) -> usize {
        let mut senders = self.senders();
        let attached = senders.len();
        senders.retain(|tx| tx.send(message.clone()).is_ok());

        let detached = attached - senders.len();
        if detached > 0 {
            tracing::trace!(detached, remaining = senders.len(), "detached closed subscriptions");
        }
        senders.len()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = Infallible;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        self.fan_out(&message);
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();
        self.senders().push(tx);
        Subscription::new(rx)
    }
}
