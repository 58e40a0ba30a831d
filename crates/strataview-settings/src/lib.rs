//! StrataView Settings Crate
//!
//! Handles application configuration and settings persistence. The layer
//! subsystem reads query lifetimes and display defaults from here, the
//! interaction engine reads hit-test tolerances.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{Config, InteractionSettings, QuerySettings, UiSettings};
pub use error::{ConfigError, Result, SettingsError};
pub use manager::SettingsManager;
