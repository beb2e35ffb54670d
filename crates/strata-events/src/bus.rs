use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::debug;

use strata_types::VersionId;

use crate::event::{ChangeEvent, EventFilter, EventKind};

/// A broadcast channel receiver for change events.
pub type EventStream = broadcast::Receiver<ChangeEvent>;

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<ChangeEvent>,
}

/// Process-wide change notification bus (one per file-system instance).
///
/// Emission is synchronous: by the time [`ChangeBus::emit`] returns, the
/// event has been stamped and fanned out to every matching subscriber.
/// Events carry strictly increasing sequence numbers, so subscribers can
/// verify causal order (a container's creation event always precedes any
/// version-created event that depends on it).
pub struct ChangeBus {
    next_seq: AtomicU64,
    subscribers: RwLock<Vec<Subscriber>>,
    channel_capacity: usize,
}

impl ChangeBus {
    /// Default capacity of per-subscriber broadcast channels.
    const DEFAULT_CAPACITY: usize = 1024;

    /// Create a bus with the default per-subscriber channel capacity.
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a bus with an explicit per-subscriber channel capacity.
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            next_seq: AtomicU64::new(0),
            subscribers: RwLock::new(Vec::new()),
            channel_capacity,
        }
    }

    /// Emit a single event, fanning it out to matching subscribers before
    /// returning.
    pub fn emit(&self, kind: EventKind, path: &str, version: Option<VersionId>) -> ChangeEvent {
        let event = ChangeEvent {
            seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
            timestamp: Utc::now(),
            kind,
            path: path.to_string(),
            version,
        };
        self.route(&event);
        debug!(seq = event.seq, kind = %event.kind, path = %event.path, "change event emitted");
        event
    }

    /// Subscribe to events matching the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.channel_capacity);
        let sub = Subscriber { filter, sender: tx };
        self.subscribers
            .write()
            .expect("bus lock poisoned")
            .push(sub);
        rx
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().expect("bus lock poisoned").len()
    }

    /// Route an event to all matching subscribers, pruning stale ones.
    fn route(&self, event: &ChangeEvent) {
        let mut subs = self.subscribers.write().expect("bus lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(event) {
                // If send fails (no receivers), the subscriber is stale.
                sub.sender.send(event.clone()).is_ok()
            } else {
                // Keep non-matching subscribers; they may match future
                // events. Only prune if the channel itself is closed.
                sub.sender.receiver_count() > 0
            }
        });
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChangeBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
