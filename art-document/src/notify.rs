//! Change notification fan-out.
//!
//! Subscribers receive a bare "something changed" signal and re-read the
//! handle. Callbacks are invoked outside the handle's state lock, so they may
//! call back into the handle.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

/// Capacity of the async change channel. Slow receivers observe `Lagged`.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Handle returned by `on_change`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Marker delivered on the async change channel.
///
/// `revision` counts notifications emitted by the handle; it carries no
/// document state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentEvent {
    /// Sequence number of this notification, starting at 1.
    pub revision: u64,
}

type Callback = Arc<dyn Fn() + Send + Sync>;

pub(crate) struct Observers {
    callbacks: Mutex<Vec<(SubscriptionId, Callback)>>,
    next_id: AtomicU64,
    revision: AtomicU64,
    events: broadcast::Sender<DocumentEvent>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            callbacks: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            revision: AtomicU64::new(0),
            events,
        }
    }

    pub(crate) fn add(&self, callback: Callback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.callbacks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((id, callback));
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        let mut callbacks = self
            .callbacks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = callbacks.len();
        callbacks.retain(|(existing, _)| *existing != id);
        callbacks.len() != before
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<DocumentEvent> {
        self.events.subscribe()
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Emit one notification to every current subscriber.
    pub(crate) fn notify(&self) {
        let revision = self.revision.fetch_add(1, Ordering::AcqRel) + 1;
        let callbacks: Vec<Callback> = self
            .callbacks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback();
        }
        // No receivers is fine.
        let _ = self.events.send(DocumentEvent { revision });
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self
            .callbacks
            .lock()
            .map_or(0, |callbacks| callbacks.len());
        f.debug_struct("Observers")
            .field("callbacks", &count)
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}
