use crate::geometry::{BoundingBox, Point2};

use super::{IntersectionCalculator, IntersectionDetail, IntersectionResult};

/// Parity (ray-casting) point-in-polygon test.
///
/// A horizontal ray from `point` towards +x toggles the result at every edge
/// with `min(y1, y2) < y <= max(y1, y2)`, `x <= max(x1, x2)`, and either a
/// vertical edge or `x` left of the crossing. The half-open y interval counts
/// a shared vertex once. For an axis-aligned box this puts the top and right
/// edges inside and the bottom and left edges outside.
pub fn point_in_polygon(point: &Point2, ring: &[Point2]) -> bool {
    let Some(last) = ring.last() else {
        return false;
    };
    let (x, y) = (point.x, point.y);
    let mut inside = false;
    let mut p1 = *last;
    for p2 in ring {
        if y > p1.y.min(p2.y) && y <= p1.y.max(p2.y) && x <= p1.x.max(p2.x) {
            let x_intersection = (y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y) + p1.x;
            if p1.x == p2.x || x <= x_intersection {
                inside = !inside;
            }
        }
        p1 = *p2;
    }
    inside
}

/// Hit test against one filled ring.
#[derive(Debug, Clone)]
pub struct PolygonCalculator {
    ring: Vec<Point2>,
    bounds: Option<BoundingBox>,
}

impl PolygonCalculator {
    pub fn new(ring: Vec<Point2>) -> Self {
        let bounds = BoundingBox::from_points(&ring);
        Self { ring, bounds }
    }
}

impl IntersectionCalculator for PolygonCalculator {
    fn calc_intersection(&self, point: Point2) -> Option<IntersectionResult> {
        if !self.bounds?.contains(&point) || !point_in_polygon(&point, &self.ring) {
            return None;
        }
        Some(IntersectionResult {
            point,
            detail: IntersectionDetail::Polygon {
                polygon: self.ring.clone(),
            },
        })
    }
}
