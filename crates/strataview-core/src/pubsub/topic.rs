//! Compile-time mapping from topic keys to snapshot payloads.

use std::fmt::Debug;
use std::hash::Hash;

/// Key type of a topic enum.
pub trait TopicKey: Copy + Eq + Hash + Debug + 'static {}

impl<T> TopicKey for T where T: Copy + Eq + Hash + Debug + 'static {}

/// Marker type binding one topic key to the payload its snapshot returns.
///
/// ```rust,ignore
/// pub struct StatusChanged;
/// impl Topic for StatusChanged {
///     type Key = LayerTopic;
///     type Payload = LayerStatus;
///     const KEY: LayerTopic = LayerTopic::Status;
/// }
/// ```
pub trait Topic {
    /// The topic-key enum this topic belongs to.
    type Key: TopicKey;
    /// The value returned by the snapshot of this topic.
    type Payload;
    /// The key that is notified when the payload changes.
    const KEY: Self::Key;
}

/// An owner that can produce the current payload of a topic.
///
/// Snapshots never have side effects.
pub trait SnapshotSource<T: Topic> {
    /// Current payload for the topic.
    fn snapshot(&self) -> T::Payload;
}

/// Turbofish access to snapshots: `owner.get_snapshot::<StatusChanged>()`.
pub trait SnapshotExt {
    /// Current payload for topic `T`.
    fn get_snapshot<T: Topic>(&self) -> T::Payload
    where
        Self: SnapshotSource<T>,
    {
        SnapshotSource::<T>::snapshot(self)
    }
}

impl<S: ?Sized> SnapshotExt for S {}
