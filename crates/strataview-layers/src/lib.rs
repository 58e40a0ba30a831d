//! # StrataView Layers
//!
//! Layer tree, settings resolution and the data-fetch lifecycle of
//! intersection layers.
//!
//! ## Architecture
//!
//! ```text
//! LayerManager (one per workspace)
//!   └── ItemTree
//!         ├── Group / View
//!         │     └── children ...
//!         ├── SharedSetting   (overrides one setting type on visible layers)
//!         └── Layer
//!               └── SettingsContext
//!                     └── Setting (value, available values, override, loading)
//! ```
//!
//! Layers resolve their settings top to bottom through a [`LayerProvider`],
//! then fetch data through a [`QueryClient`]. Shared settings intersect the
//! candidate lists of the layers below their group and push one value down.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strataview_layers::{LayerKind, LayerManager, SettingType};
//!
//! let manager = LayerManager::new(client, session, config);
//! let root = manager.root();
//! let layer = manager.append_child(root, manager.create_layer(LayerKind::RealizationGrid))?;
//! manager.set_setting_value(layer, SettingType::Realization, 3)?;
//! ```
//!
//! Fetches run as local tasks, so the manager must be driven from inside a
//! `tokio::task::LocalSet`.

pub mod context;
pub mod data;
pub mod group;
pub mod item;
pub mod layer;
pub mod manager;
pub mod providers;
pub mod query;
pub mod session;
pub mod setting;
pub mod shared_setting;
pub mod snapshot;
pub mod tree;

pub use context::{ChangeOutcome, ContextTopic, SettingsContextDelegate};
pub use data::{
    FenceMeshSection, GridIntersectionData, GridModelInfo, GridPropertyInfo, LayerData,
    LayerMetadata, SurfaceArea, SurfaceIntersectionData, SurfaceIntersectionLine, SurfaceMeta,
    SurfaceMetaSet, SurfaceTimeType, WellboreHeader, WellborePathData, WellborePick,
};
pub use group::{GroupDelegate, GroupKind, GroupTopic};
pub use item::{ItemDelegate, ItemTopic};
pub use layer::{Completion, FetchRequest, LayerDelegate, LayerStatus, LayerTopic, RefreshOutcome};
pub use manager::{LayerManager, ManagerTopic};
pub use providers::{
    FixupInputs, LayerKind, LayerProvider, RealizationGridProvider, RealizationSurfaceProvider,
    WellborePathProvider,
};
pub use query::{InMemoryQueryClient, QueryClient, QueryKey, QueryOptions};
pub use session::{EnsembleSession, StaticEnsembleSession};
pub use setting::{
    time_or_interval_label, EnsembleIdent, SettingDelegate, SettingTopic, SettingType,
    SettingValue, NO_TIME,
};
pub use shared_setting::{intersect_available_values, SharedSettingDelegate};
pub use snapshot::SettingsSnapshot;
pub use tree::{ChildSource, DetachedItem, ItemKind, ItemTree, Node};
