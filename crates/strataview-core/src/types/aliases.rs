//! Type aliases for commonly used shared types.
//!
//! The layer tree runs on a single thread, so shared state is `Rc<RefCell<T>>`
//! throughout. The aliases keep signatures readable where these nest.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strataview_core::types::*;
//!
//! // Instead of: Rc<RefCell<Vec<IntersectionHit>>>
//! let hits: SharedVec<IntersectionHit> = shared_vec();
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// Non-owning counterpart of [`Shared`].
pub type WeakShared<T> = Weak<RefCell<T>>;

/// An optional shared reference, for lazily-initialized shared state.
pub type SharedOption<T> = Rc<RefCell<Option<T>>>;

/// A shared vector for single-threaded collection management.
pub type SharedVec<T> = Rc<RefCell<Vec<T>>>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

/// Create a new `SharedOption<T>` initialized to `None`.
#[inline]
pub fn shared_none<T>() -> SharedOption<T> {
    Rc::new(RefCell::new(None))
}

/// Create a new empty `SharedVec<T>`.
#[inline]
pub fn shared_vec<T>() -> SharedVec<T> {
    Rc::new(RefCell::new(Vec::new()))
}
