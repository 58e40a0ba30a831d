//! # StrataView Interaction
//!
//! Pointer interaction for intersection views: hit testing of the shapes a
//! layer draws, the readout and highlight overlays fed by the hits, and the
//! editor for user-drawn intersection polylines.
//!
//! ## Architecture
//!
//! ```text
//! LayerData ──layer_objects──► IntersectionItem ──► IntersectionHandler
//!                                                      │ (calculators, in order)
//!   pointer pixel ──Viewport──► world point ───────────┘
//!                                                      ▼ INTERSECTION
//!                                  ReadoutOverlay + HighlightOverlay
//!
//! PolylineEditor ──commit──► IntersectionPolylines (JSON)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use strataview_interaction::{InteractionHandler, Point2, Viewport};
//!
//! let interaction = InteractionHandler::new(config.interaction.clone(), Viewport::default());
//! interaction.sync_with_manager(&manager);
//! interaction.pointer_move(Point2::new(412.0, 230.0));
//! println!("{}", interaction.readout_text());
//! ```

pub mod calculators;
pub mod geometry;
pub mod handler;
pub mod interaction;
pub mod layer_objects;
pub mod overlay;
pub mod polyline_editor;
pub mod polylines;
pub mod viewport;

pub use calculators::{
    make_calculator, point_in_polygon, IntersectionCalculator, IntersectionDetail,
    IntersectionItem, IntersectionResult, PolygonSoupData, ReferenceSystem, Shape, ShapeData,
};
pub use geometry::{BoundingBox, BoundingSphere, Point2};
pub use handler::{IntersectionHandler, IntersectionHit, IntersectionTopic, Intersections};
pub use interaction::InteractionHandler;
pub use layer_objects::{make_layer_data_objects, LayerDataObject};
pub use overlay::{
    HighlightItem, HighlightMarker, HighlightOverlay, HighlightShape, ReadoutEntry, ReadoutItem,
    ReadoutOverlay,
};
pub use polyline_editor::{ClickOutcome, EditorState, PolylineEditor};
pub use polylines::{IntersectionPolyline, IntersectionPolylines};
pub use viewport::{VerticalAxis, Viewport};
