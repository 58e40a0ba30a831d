//! # StrataView Core
//!
//! Core types, errors, and utilities shared by every StrataView crate.
//! Provides stable item identifiers, the typed publish/subscribe primitive
//! that all delegates are built on, and the error taxonomy.

pub mod constants;
pub mod error;
pub mod ids;
pub mod pubsub;
pub mod types;

pub use error::{Error, FetchError, PolylineEditError, Result, StructuralError};

pub use ids::{ItemId, ManagerId};

// Re-export publish/subscribe for convenience
pub use pubsub::{
    Listener, Outbox, PublishSubscribe, SnapshotExt, SnapshotSource, Subscription,
    SubscriptionId, Topic, TopicKey,
};

pub use types::{shared, shared_none, shared_vec, Shared, SharedOption, SharedVec, WeakShared};
