//! Shared default values.

/// Pixel distance within which a hit is reported to readout subscribers.
pub const DEFAULT_INTERSECTION_THRESHOLD_PX: f64 = 10.0;

/// Margin around point and line shapes, in world units.
pub const DEFAULT_SHAPE_MARGIN: f64 = 10.0;

/// Number of hits listed in the readout box before summarising the rest.
pub const DEFAULT_READOUT_MAX_ITEMS: usize = 3;

/// Radius of point highlight markers, in pixels.
pub const DEFAULT_HIGHLIGHT_POINT_RADIUS: f64 = 5.0;

/// Pixel radius for picking an existing polyline vertex.
pub const DEFAULT_VERTEX_PICK_RADIUS_PX: f64 = 8.0;

/// Query results are fresh for one minute.
pub const QUERY_STALE_TIME_MS: u64 = 60_000;

/// Unused query results are kept for one minute.
pub const QUERY_CACHE_TIME_MS: u64 = 60_000;

/// Padding used when fitting a viewport to content bounds.
pub const VIEW_PADDING: f64 = 0.05;

/// Viewport zoom limits.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 50.0;
