//! Notification Bridge
//!
//! Typed notifications delivered through explicit per-subscriber channels.
//! Backends subscribe at construction and unsubscribe when their
//! `Subscription` drops; the hub fans every broadcast out to all live
//! subscribers. There is no process-wide bus and no polling: draining a
//! subscription is the only pathway into the remote backend's
//! resynchronization machinery.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::trace;

use crate::settings::Namespace;

/// Asynchronous events that drive resynchronization.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// Persisted preferences changed; optionally limited to a subset of
    /// configuration namespaces.
    PreferencesUpdated { namespaces: Option<Vec<Namespace>> },

    /// The in-process backend's sample rate changed; rate-dependent features
    /// (the convolver) must be re-applied.
    SampleRateUpdated,

    /// A liveprog script was edited and should be reloaded.
    LiveprogReload,

    /// Clear backend-local caches and re-apply the full configuration.
    SoftReboot,

    /// Tear down and recreate the remote instance unconditionally.
    HardReboot,
}

struct HubInner {
    subscribers: Mutex<Vec<(u64, Sender<Notification>)>>,
    next_id: AtomicU64,
}

/// Fan-out hub for `Notification`s.
#[derive(Clone)]
pub struct NotificationHub {
    inner: Arc<HubInner>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(HubInner {
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Register a new subscriber. Dropping the returned `Subscription`
    /// unregisters it.
    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = unbounded();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().push((id, sender));
        Subscription {
            hub: self.clone(),
            id,
            receiver,
        }
    }

    /// Deliver a notification to every live subscriber.
    pub fn broadcast(&self, notification: Notification) {
        trace!(?notification, "broadcasting");
        let mut subscribers = self.inner.subscribers.lock();
        // Prune subscribers whose receiving end is gone
        subscribers.retain(|(_, sender)| sender.send(notification.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    fn unsubscribe(&self, id: u64) {
        self.inner.subscribers.lock().retain(|(sid, _)| *sid != id);
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

/// One subscriber's receiving end. Unsubscribes on drop.
pub struct Subscription {
    hub: NotificationHub,
    id: u64,
    receiver: Receiver<Notification>,
}

impl Subscription {
    /// Next pending notification, if any. Never blocks.
    pub fn try_recv(&self) -> Option<Notification> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
