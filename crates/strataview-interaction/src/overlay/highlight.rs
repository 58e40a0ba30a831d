use strataview_core::constants::DEFAULT_HIGHLIGHT_POINT_RADIUS;

use crate::geometry::Point2;
use crate::viewport::Viewport;

/// World-space shape to highlight.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightShape {
    Point(Point2),
    Polygon(Vec<Point2>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightItem {
    pub color: String,
    pub label: String,
    pub shape: HighlightShape,
}

/// Pixel-space marker ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum HighlightMarker {
    Circle {
        center: Point2,
        radius: f64,
        color: String,
    },
    /// Filled and stroked in the same colour.
    Polygon { points: Vec<Point2>, color: String },
}

/// Markers for the hits under the pointer.
///
/// Hidden while the pointer is held down and moving (a pan) and on every
/// rescale; shown again on pointer up or when new items arrive outside a
/// drag.
#[derive(Debug, Clone)]
pub struct HighlightOverlay {
    point_radius: f64,
    items: Vec<HighlightItem>,
    visible: bool,
    pointer_down: bool,
}

impl HighlightOverlay {
    pub fn new(point_radius: f64) -> Self {
        Self {
            point_radius,
            items: Vec::new(),
            visible: false,
            pointer_down: false,
        }
    }

    pub fn set_items(&mut self, items: Vec<HighlightItem>) {
        self.items = items;
        self.visible = !self.pointer_down;
    }

    pub fn items(&self) -> &[HighlightItem] {
        &self.items
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn pointer_down(&mut self) {
        self.pointer_down = true;
    }

    pub fn pointer_move(&mut self) {
        if self.pointer_down {
            self.visible = false;
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_down = false;
        self.visible = true;
    }

    pub fn rescale(&mut self) {
        self.visible = false;
    }

    /// Markers projected through `viewport`; empty while hidden.
    pub fn markers(&self, viewport: &Viewport) -> Vec<HighlightMarker> {
        if !self.visible {
            return Vec::new();
        }
        self.items
            .iter()
            .map(|item| match &item.shape {
                HighlightShape::Point(point) => HighlightMarker::Circle {
                    center: viewport.world_to_pixel(*point),
                    radius: self.point_radius,
                    color: item.color.clone(),
                },
                HighlightShape::Polygon(ring) => HighlightMarker::Polygon {
                    points: ring.iter().map(|p| viewport.world_to_pixel(*p)).collect(),
                    color: item.color.clone(),
                },
            })
            .collect()
    }
}

impl Default for HighlightOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_HIGHLIGHT_POINT_RADIUS)
    }
}
