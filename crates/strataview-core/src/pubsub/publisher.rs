//! PublishSubscribe implementation.
//!
//! Single-threaded topic registry. Handles are cheap clones sharing one
//! registry, so a listener can hold its own publisher without borrowing the
//! owner.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use uuid::Uuid;

use super::topic::{Topic, TopicKey};

/// Listener invoked on every notify of its topic.
pub type Listener = Rc<dyn Fn()>;

/// Subscription handle identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

struct Registry<K> {
    topics: HashMap<K, Vec<(SubscriptionId, Listener)>>,
}

impl<K: TopicKey> Registry<K> {
    fn remove(&mut self, topic: K, id: SubscriptionId) -> bool {
        let Some(listeners) = self.topics.get_mut(&topic) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.topics.remove(&topic);
        }
        removed
    }
}

/// Topic-keyed observable.
pub struct PublishSubscribe<K> {
    registry: Rc<RefCell<Registry<K>>>,
}

impl<K: TopicKey> PublishSubscribe<K> {
    /// Create a publisher with no subscribers
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                topics: HashMap::new(),
            })),
        }
    }

    /// Register a listener for `topic`.
    ///
    /// The listener stays registered until [`Subscription::unsubscribe`] is
    /// called or the publisher is dropped.
    pub fn subscribe<F>(&self, topic: K, listener: F) -> Subscription<K>
    where
        F: Fn() + 'static,
    {
        let id = SubscriptionId::new();
        self.registry
            .borrow_mut()
            .topics
            .entry(topic)
            .or_default()
            .push((id, Rc::new(listener)));
        tracing::debug!("Subscription {} added to {:?}", id, topic);
        Subscription {
            registry: Rc::downgrade(&self.registry),
            topic,
            id,
        }
    }

    /// Register a listener for the key of the typed topic `T`.
    pub fn subscribe_to<T, F>(&self, listener: F) -> Subscription<K>
    where
        T: Topic<Key = K>,
        F: Fn() + 'static,
    {
        self.subscribe(T::KEY, listener)
    }

    /// Remove a listener by id. Returns true if it was registered.
    pub fn unsubscribe(&self, topic: K, id: SubscriptionId) -> bool {
        let removed = self.registry.borrow_mut().remove(topic, id);
        if removed {
            tracing::debug!("Subscription {} removed from {:?}", id, topic);
        }
        removed
    }

    /// Invoke every listener currently registered for `topic`.
    ///
    /// Listeners run in registration order against a snapshot taken before
    /// the first call: listeners added meanwhile wait for the next notify,
    /// listeners removed meanwhile still run this time.
    pub fn notify(&self, topic: K) {
        for listener in self.listeners(topic) {
            listener();
        }
    }

    /// Snapshot of the listeners registered for `topic`.
    pub fn listeners(&self, topic: K) -> Vec<Listener> {
        self.registry
            .borrow()
            .topics
            .get(&topic)
            .map(|listeners| listeners.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default()
    }

    /// Number of listeners registered for `topic`.
    pub fn subscriber_count(&self, topic: K) -> usize {
        self.registry
            .borrow()
            .topics
            .get(&topic)
            .map_or(0, Vec::len)
    }

    /// Number of listeners across all topics.
    pub fn total_subscriber_count(&self) -> usize {
        self.registry.borrow().topics.values().map(Vec::len).sum()
    }

    /// Remove every listener.
    pub fn clear(&self) {
        self.registry.borrow_mut().topics.clear();
    }
}

impl<K: TopicKey> Default for PublishSubscribe<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for PublishSubscribe<K> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<K: TopicKey> fmt::Debug for PublishSubscribe<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishSubscribe")
            .field("subscribers", &self.total_subscriber_count())
            .finish()
    }
}

/// Handle returned by [`PublishSubscribe::subscribe`].
///
/// Dropping the handle keeps the listener registered; call
/// [`unsubscribe`](Self::unsubscribe) to remove it.
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct Subscription<K> {
    registry: Weak<RefCell<Registry<K>>>,
    topic: K,
    id: SubscriptionId,
}

impl<K: TopicKey> Subscription<K> {
    /// The subscription id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The topic this subscription listens to.
    pub fn topic(&self) -> K {
        self.topic
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            registry
                .borrow()
                .topics
                .get(&self.topic)
                .is_some_and(|listeners| listeners.iter().any(|(id, _)| *id == self.id))
        })
    }

    /// Remove the listener. Returns true if it was still registered.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };
        let removed = registry.borrow_mut().remove(self.topic, self.id);
        if removed {
            tracing::debug!("Subscription {} removed from {:?}", self.id, self.topic);
        }
        removed
    }
}

impl<K: TopicKey> fmt::Debug for Subscription<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .finish()
    }
}
