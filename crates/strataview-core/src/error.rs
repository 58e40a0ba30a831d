//! Error handling for StrataView
//!
//! Provides the error types of the layer and interaction subsystems:
//! - Structural errors (tree mutation misuse, raised synchronously)
//! - Fetch errors (stored on layers, never propagated)
//! - Polyline edit errors (validation failures surfaced to the editor)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;
use uuid::Uuid;

use crate::ids::ItemId;

/// Structural error type
///
/// Raised when a tree mutation is called with an index or id that does not
/// fit the current shape of the tree. These are programmer errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    /// Index outside the valid range for the group
    #[error("Index {index} out of range for group with {len} children")]
    InvalidIndex {
        /// The requested index.
        index: usize,
        /// The number of children in the group.
        len: usize,
    },

    /// No item with this id exists in the tree
    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    /// The item exists but is not a group
    #[error("Item {0} is not a group")]
    NotAGroup(ItemId),

    /// The item exists but is not a layer
    #[error("Item {0} is not a layer")]
    NotALayer(ItemId),

    /// The item exists but is not a shared setting
    #[error("Item {0} is not a shared setting")]
    NotASharedSetting(ItemId),

    /// The item is not a direct child of the group
    #[error("Item {item} is not a child of group {group}")]
    NotAChild {
        /// The item that was looked up.
        item: ItemId,
        /// The group that was searched.
        group: ItemId,
    },

    /// Moving a group into its own subtree
    #[error("Moving {item} into {target} would create a cycle")]
    CycleDetected {
        /// The item being moved.
        item: ItemId,
        /// The target group.
        target: ItemId,
    },

    /// The root group cannot be moved, removed or re-parented
    #[error("The root group cannot be moved or removed")]
    RootImmutable,

    /// The layer has no setting of the requested type
    #[error("Item {item} has no setting '{setting}'")]
    UnknownSetting {
        /// The layer or shared setting.
        item: ItemId,
        /// The requested setting type.
        setting: String,
    },
}

/// Fetch error type
///
/// Represents a failed query. Layers store these as their error detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The query client reported a failure
    #[error("Query '{endpoint}' failed: {message}")]
    Query {
        /// The endpoint of the failed query.
        endpoint: String,
        /// The failure message.
        message: String,
    },

    /// The remote service answered with an error status
    #[error("Service error {status}: {message}")]
    Service {
        /// The status code.
        status: u16,
        /// The message returned by the service.
        message: String,
    },

    /// The response could not be decoded into the expected shape
    #[error("Could not decode response: {0}")]
    Decode(String),

    /// The query was cancelled by the query client
    #[error("Query was cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Polyline edit error type
///
/// Validation failures of the interactive polyline editor and its store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolylineEditError {
    /// Fewer than two vertices
    #[error("A polyline needs at least 2 points, it has {count}")]
    TooFewPoints {
        /// The current number of vertices.
        count: usize,
    },

    /// The name is empty or whitespace
    #[error("The polyline needs a name")]
    EmptyName,

    /// Another polyline already uses the name
    #[error("A polyline named '{0}' already exists")]
    DuplicateName(String),

    /// The operation needs an active edit session
    #[error("No polyline is being edited")]
    NotEditing,

    /// The operation needs the naming step
    #[error("Point editing has not been finished")]
    NotNaming,

    /// No stored polyline has this id
    #[error("Polyline {0} not found")]
    UnknownPolyline(Uuid),
}

/// Main error type for StrataView
///
/// Unified error type that can represent any error in the system.
#[derive(Error, Debug)]
pub enum Error {
    /// Structural error
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Polyline edit error
    #[error(transparent)]
    PolylineEdit(#[from] PolylineEditError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a structural error
    pub fn is_structural_error(&self) -> bool {
        matches!(self, Error::Structural(_))
    }

    /// Check if this is a fetch error
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Error::Fetch(_))
    }

    /// Check if this is a polyline edit error
    pub fn is_polyline_edit_error(&self) -> bool {
        matches!(self, Error::PolylineEdit(_))
    }
}

/// Result type alias for StrataView operations
pub type Result<T> = std::result::Result<T, Error>;
