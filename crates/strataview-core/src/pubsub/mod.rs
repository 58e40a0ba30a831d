//! # Publish/Subscribe Module
//!
//! Topic-keyed observables that every delegate in the layer tree is built on.
//!
//! ## Overview
//!
//! - Each owner declares a topic-key enum and holds a [`PublishSubscribe`]
//!   over it
//! - Listeners are synchronous and run in registration order
//! - Every `notify` snapshots the listener list first, so listeners may
//!   subscribe, unsubscribe or notify again without deadlocking
//! - Payloads are read through typed snapshots: a [`Topic`] marker type maps
//!   a topic key to its payload type at compile time, and the owner
//!   implements [`SnapshotSource`] for it
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strataview_core::pubsub::{PublishSubscribe, SnapshotExt};
//!
//! let publisher = PublishSubscribe::<CounterTopic>::new();
//! let subscription = publisher.subscribe(CounterTopic::Changed, move || {
//!     println!("count is now {}", counter.get_snapshot::<Changed>());
//! });
//!
//! publisher.notify(CounterTopic::Changed);
//! subscription.unsubscribe();
//! ```

mod outbox;
mod publisher;
mod topic;

pub use outbox::*;
pub use publisher::*;
pub use topic::*;
