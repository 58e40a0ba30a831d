//! Type system utilities and aliases.
//!
//! ## Modules
//!
//! - [`aliases`]: Type aliases for `Rc<RefCell<T>>` and constructor helpers.

pub mod aliases;

pub use aliases::*;
