//! Deferred notifications.
//!
//! Owners that keep their state behind a `RefCell` post notifications here
//! while the state is mutably borrowed, then flush after the borrow ends so
//! listeners can read the state again.

use super::publisher::PublishSubscribe;
use super::topic::TopicKey;

type PendingNotify = Box<dyn FnOnce()>;

/// Queue of notifications waiting for a borrow to end.
#[derive(Default)]
pub struct Outbox {
    pending: Vec<PendingNotify>,
}

impl Outbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notify of `topic` on `publisher`.
    ///
    /// The listener snapshot is taken when the outbox is flushed.
    pub fn post<K: TopicKey>(&mut self, publisher: &PublishSubscribe<K>, topic: K) {
        let publisher = publisher.clone();
        self.pending.push(Box::new(move || publisher.notify(topic)));
    }

    /// Number of queued notifications.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move every queued notification of `other` to the end of this outbox.
    pub fn append(&mut self, other: &mut Outbox) {
        self.pending.append(&mut other.pending);
    }

    /// Deliver queued notifications in the order they were posted.
    pub fn flush(self) {
        for notify in self.pending {
            notify();
        }
    }
}

impl std::fmt::Debug for Outbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outbox")
            .field("pending", &self.pending.len())
            .finish()
    }
}
