use crate::geometry::{BoundingSphere, Point2};

use super::{IntersectionCalculator, IntersectionDetail, IntersectionResult};

/// Hits within `margin` of a single point.
#[derive(Debug, Clone)]
pub struct PointCalculator {
    sphere: BoundingSphere,
}

impl PointCalculator {
    pub fn new(point: Point2, margin: f64) -> Self {
        Self {
            sphere: BoundingSphere::new(point, margin),
        }
    }
}

impl IntersectionCalculator for PointCalculator {
    fn calc_intersection(&self, point: Point2) -> Option<IntersectionResult> {
        if !self.sphere.contains(&point) {
            return None;
        }
        Some(IntersectionResult {
            point: self.sphere.center(),
            detail: IntersectionDetail::Point,
        })
    }
}
