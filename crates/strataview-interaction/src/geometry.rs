//! 2D primitives shared by the viewport and the intersection calculators.
//!
//! World coordinates of an intersection view are `(u, z)`: horizontal
//! distance along the intersection and depth.

use serde::{Deserialize, Serialize};

/// A point in world or pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point2> for [f64; 2] {
    fn from(point: Point2) -> Self {
        [point.x, point.y]
    }
}

/// Axis-aligned box. Containment is inclusive on every side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    min: Point2,
    max: Point2,
}

impl BoundingBox {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Smallest box around `points`, or `None` when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self::new(first, first), |bbox, point| Self {
            min: Point2::new(bbox.min.x.min(point.x), bbox.min.y.min(point.y)),
            max: Point2::new(bbox.max.x.max(point.x), bbox.max.y.max(point.y)),
        }))
    }

    pub fn min(&self) -> Point2 {
        self.min
    }

    pub fn max(&self) -> Point2 {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Grow the box by `margin` in every direction.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    pub fn contains(&self, point: &Point2) -> bool {
        self.min.x <= point.x
            && self.max.x >= point.x
            && self.min.y <= point.y
            && self.max.y >= point.y
    }
}

/// Disc around a point. Containment is inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    center: Point2,
    radius: f64,
}

impl BoundingSphere {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Point2 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn contains(&self, point: &Point2) -> bool {
        self.center.distance_to(point) <= self.radius
    }
}

/// Closest point to `point` on the segment `a`-`b`, with its parameter along
/// the segment in `[0, 1]`.
pub fn project_on_segment(point: &Point2, a: &Point2, b: &Point2) -> (Point2, f64) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return (*a, 0.0);
    }
    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    (Point2::new(a.x + t * dx, a.y + t * dy), t)
}
