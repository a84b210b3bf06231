//! Single-consumer one-shot notifications.
//!
//! [`OneShotEvent`] carries events such as "post created" that the
//! presentation layer must handle once. A value is delivered to at most one
//! subscriber and at most once: re-attaching a subscriber (for example after
//! a screen is rebuilt) does not replay a value that was already consumed.
//! A value emitted while nobody is attached waits for the next subscriber.
//!
//! Only one subscriber may be attached at a time; a second
//! [`OneShotEvent::subscribe`] fails until the first is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::Notify;

/// Errors from subscribing to a [`OneShotEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// Another subscriber is still attached.
    #[error("event already has an active subscriber")]
    AlreadyObserved,
}

/// An event delivered at most once to a single active subscriber.
///
/// Clones share the same event.
#[derive(Debug)]
pub struct OneShotEvent<T> {
    shared: Arc<Shared<T>>,
}

#[derive(Debug)]
struct Shared<T> {
    slot: Mutex<Slot<T>>,
    notify: Notify,
}

#[derive(Debug)]
struct Slot<T> {
    /// Emitted value not yet delivered.
    pending: Option<T>,
    /// A subscriber is attached.
    observed: bool,
}

impl<T> Shared<T> {
    fn slot(&self) -> MutexGuard<'_, Slot<T>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> OneShotEvent<T> {
    /// Create an event with nothing pending.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    pending: None,
                    observed: false,
                }),
                notify: Notify::new(),
            }),
        }
    }

    /// Emit a value, replacing any value still pending.
    pub fn emit(&self, value: T) {
        self.shared.slot().pending = Some(value);
        self.shared.notify.notify_one();
    }

    /// Whether a value is waiting to be delivered.
    pub fn is_pending(&self) -> bool {
        self.shared.slot().pending.is_some()
    }

    /// Whether a subscriber is currently attached.
    pub fn has_subscriber(&self) -> bool {
        self.shared.slot().observed
    }

    /// Attach the single subscriber.
    ///
    /// Fails with [`EventError::AlreadyObserved`] while another subscriber
    /// is alive.
    pub fn subscribe(&self) -> Result<EventSubscriber<T>, EventError> {
        let mut slot = self.shared.slot();
        if slot.observed {
            return Err(EventError::AlreadyObserved);
        }
        slot.observed = true;
        Ok(EventSubscriber {
            shared: Arc::clone(&self.shared),
        })
    }
}

impl<T> Clone for OneShotEvent<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for OneShotEvent<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The attached end of a [`OneShotEvent`]. Dropping it detaches.
#[derive(Debug)]
pub struct EventSubscriber<T> {
    shared: Arc<Shared<T>>,
}

impl<T> EventSubscriber<T> {
    /// Take the pending value, if any, without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.shared.slot().pending.take()
    }

    /// Wait for the next value and consume it.
    pub async fn recv(&mut self) -> T {
        loop {
            if let Some(value) = self.try_recv() {
                return value;
            }
            // notify_one stores a permit, so an emit between the check
            // above and this await is not lost.
            self.shared.notify.notified().await;
        }
    }
}

impl<T> Drop for EventSubscriber<T> {
    fn drop(&mut self) {
        self.shared.slot().observed = false;
    }
}
