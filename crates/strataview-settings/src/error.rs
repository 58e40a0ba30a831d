//! Errors of loading, saving and validating the StrataView configuration.

use std::io;
use thiserror::Error;

/// Failure to read or write the configuration file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// No platform config directory, or it could not be created.
    #[error("Cannot use settings directory: {0}")]
    ConfigDirectory(String),

    #[error("Settings file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid TOML settings: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("Cannot encode settings as TOML: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    /// The file parsed but holds unusable values.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A configuration that parsed but cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Only `.json` and `.toml` files are understood.
    #[error("Unsupported settings file extension '{0}'")]
    UnsupportedFormat(String),

    /// A tolerance or count outside its usable range.
    #[error("Setting '{key}' cannot be {value}")]
    ValueOutOfRange { key: String, value: String },

    /// A colour scale or colour left blank.
    #[error("Setting '{0}' must not be empty")]
    EmptyValue(String),
}

pub type Result<T> = std::result::Result<T, SettingsError>;
