//! # StrataView
//!
//! Layer management and intersection-view interaction for subsurface
//! visualisation workbenches.
//!
//! ## Architecture
//!
//! StrataView is organized as a workspace with multiple crates:
//!
//! 1. **strataview-core** - Errors, ids, typed publish/subscribe, constants
//! 2. **strataview-settings** - Configuration and its persistence
//! 3. **strataview-layers** - Layer tree, settings resolution, data fetching
//! 4. **strataview-interaction** - Hit testing, readout, polyline editing
//! 5. **strataview** - Umbrella crate re-exporting the above
//!
//! ## Features
//!
//! - **Layer Tree**: Groups, views, layers and shared settings under one manager
//! - **Settings Resolution**: Dependent settings refreshed top to bottom with fixups
//! - **Shared Settings**: One value pushed down to every visible layer of a group
//! - **Data Lifecycle**: Cancellable fetches with stale-result protection
//! - **Interaction**: Pixel-threshold hit testing over lines, polygons and grids
//! - **Polylines**: Interactive editing and JSON persistence of intersection lines

pub use strataview_core as core;
pub use strataview_interaction as interaction;
pub use strataview_layers as layers;
pub use strataview_settings as settings;

pub use strataview_core::{
    Error, FetchError, ItemId, PolylineEditError, PublishSubscribe, Result, SnapshotExt,
    StructuralError, Subscription,
};

pub use strataview_layers::{
    DetachedItem, EnsembleSession, LayerData, LayerKind, LayerManager, LayerStatus, QueryClient,
    SettingType, SettingValue,
};

pub use strataview_interaction::{
    InteractionHandler, IntersectionHandler, IntersectionPolylines, Point2, PolylineEditor,
    Viewport,
};

pub use strataview_settings::{Config, SettingsManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support, `info` otherwise
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
