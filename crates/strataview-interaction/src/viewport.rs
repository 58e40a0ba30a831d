//! Viewport and coordinate transformation for intersection views.
//!
//! Converts between pixel coordinates (screen space) and world coordinates
//! (`u` along the intersection, depth). Manages zoom and pan with the
//! pointer-anchored zoom the intersection canvas uses.

use std::fmt;

use strataview_core::constants::{MAX_ZOOM, MIN_ZOOM, VIEW_PADDING};

use crate::geometry::{BoundingBox, Point2};

/// Direction in which world y grows on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAxis {
    /// World y grows downwards, as depth does.
    #[default]
    Down,
    /// World y grows upwards.
    Up,
}

/// Represents the viewport transformation state (zoom and pan).
#[derive(Debug, Clone)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
    canvas_width: f64,
    canvas_height: f64,
    vertical: VerticalAxis,
}

const MARGIN: f64 = 5.0;

impl Viewport {
    /// Creates a viewport with depth growing downwards and world (0,0) at
    /// the top-left, a small margin in from the edge.
    pub fn new(canvas_width: f64, canvas_height: f64) -> Self {
        Self {
            zoom: 1.0,
            pan_x: MARGIN,
            pan_y: MARGIN,
            canvas_width,
            canvas_height,
            vertical: VerticalAxis::Down,
        }
    }

    pub fn with_vertical_axis(mut self, vertical: VerticalAxis) -> Self {
        self.vertical = vertical;
        self
    }

    pub fn vertical_axis(&self) -> VerticalAxis {
        self.vertical
    }

    pub fn canvas_width(&self) -> f64 {
        self.canvas_width
    }

    pub fn canvas_height(&self) -> f64 {
        self.canvas_height
    }

    /// Sets the canvas dimensions (typically called when the view resizes).
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
    }

    /// Pixels per world unit.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level; values outside the zoom limits are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom > MIN_ZOOM && zoom < MAX_ZOOM {
            self.zoom = zoom;
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * 1.2);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / 1.2);
    }

    pub fn pan_x(&self) -> f64 {
        self.pan_x
    }

    pub fn pan_y(&self) -> f64 {
        self.pan_y
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan_x = x;
        self.pan_y = y;
    }

    /// Pans by a delta in pixels.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Converts a pixel position to world coordinates.
    ///
    /// ```text
    /// world_x = (pixel_x - pan_x) / zoom
    /// world_y = (pixel_y - pan_y) / zoom                   // Down
    /// world_y = (canvas_height - pixel_y - pan_y) / zoom   // Up
    /// ```
    pub fn pixel_to_world(&self, pixel: Point2) -> Point2 {
        let world_x = (pixel.x - self.pan_x) / self.zoom;
        let world_y = match self.vertical {
            VerticalAxis::Down => (pixel.y - self.pan_y) / self.zoom,
            VerticalAxis::Up => (self.canvas_height - pixel.y - self.pan_y) / self.zoom,
        };
        Point2::new(world_x, world_y)
    }

    /// Converts world coordinates to a pixel position.
    pub fn world_to_pixel(&self, world: Point2) -> Point2 {
        let pixel_x = world.x * self.zoom + self.pan_x;
        let pixel_y = match self.vertical {
            VerticalAxis::Down => world.y * self.zoom + self.pan_y,
            VerticalAxis::Up => self.canvas_height - (world.y * self.zoom + self.pan_y),
        };
        Point2::new(pixel_x, pixel_y)
    }

    /// Fits `bounds` into the viewport, reserving `padding` (0.0 - 1.0) of
    /// each dimension, and centers the content.
    pub fn fit_to_bounds(&mut self, bounds: &BoundingBox, padding: f64) {
        let width = bounds.width();
        let height = bounds.height();
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let padding_factor = 1.0 - (padding * 2.0);
        let zoom_x = (self.canvas_width * padding_factor) / width;
        let zoom_y = (self.canvas_height * padding_factor) / height;
        let new_zoom = zoom_x.min(zoom_y).clamp(MIN_ZOOM, MAX_ZOOM);

        let left = self.canvas_width / 2.0 - width * new_zoom / 2.0;
        let top = self.canvas_height / 2.0 - height * new_zoom / 2.0;

        self.zoom = new_zoom;
        self.pan_x = left - bounds.min().x * new_zoom;
        self.pan_y = match self.vertical {
            VerticalAxis::Down => top - bounds.min().y * new_zoom,
            VerticalAxis::Up => {
                self.canvas_height - top - height * new_zoom - bounds.min().y * new_zoom
            }
        };
    }

    /// [`fit_to_bounds`](Self::fit_to_bounds) with the default padding.
    pub fn fit_to_view(&mut self, bounds: &BoundingBox) {
        self.fit_to_bounds(bounds, VIEW_PADDING);
    }

    /// Zooms while keeping `world_point` at the same pixel position.
    pub fn zoom_to_point(&mut self, world_point: Point2, new_zoom: f64) {
        if new_zoom <= MIN_ZOOM || new_zoom >= MAX_ZOOM {
            return;
        }

        let pixel = self.world_to_pixel(world_point);
        self.zoom = new_zoom;
        self.pan_x = pixel.x - world_point.x * new_zoom;
        self.pan_y = match self.vertical {
            VerticalAxis::Down => pixel.y - world_point.y * new_zoom,
            VerticalAxis::Up => self.canvas_height - pixel.y - world_point.y * new_zoom,
        };
    }

    pub fn zoom_in_at(&mut self, world_point: Point2) {
        self.zoom_to_point(world_point, self.zoom * 1.2);
    }

    pub fn zoom_out_at(&mut self, world_point: Point2) {
        self.zoom_to_point(world_point, self.zoom / 1.2);
    }

    /// Centers the viewport on a world coordinate.
    pub fn center_on(&mut self, world: Point2) {
        self.pan_x = self.canvas_width / 2.0 - world.x * self.zoom;
        self.pan_y = self.canvas_height / 2.0 - world.y * self.zoom;
    }

    /// Resets to 1:1 zoom and the default margin.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan_x = MARGIN;
        self.pan_y = MARGIN;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Pan: ({:.1}, {:.1})",
            self.zoom, self.pan_x, self.pan_y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}
