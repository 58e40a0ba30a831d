use crate::geometry::{project_on_segment, BoundingBox, Point2};

use super::{IntersectionCalculator, IntersectionDetail, IntersectionResult};

/// Nearest-segment hit test against a polyline.
#[derive(Debug, Clone)]
pub struct LineCalculator {
    points: Vec<Point2>,
    margin: f64,
    bounds: Option<BoundingBox>,
}

impl LineCalculator {
    pub fn new(points: Vec<Point2>, margin: f64) -> Self {
        let bounds = BoundingBox::from_points(&points).map(|bbox| bbox.expanded(margin));
        Self {
            points,
            margin,
            bounds,
        }
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Projection of `point` on the nearest segment, with that segment's
    /// index, if it lies within the margin.
    pub fn nearest(&self, point: Point2) -> Option<(Point2, usize)> {
        if !self.bounds?.contains(&point) {
            return None;
        }

        let (projected, segment_index) = match self.points.as_slice() {
            [] => return None,
            [only] => (*only, 0),
            points => points
                .windows(2)
                .enumerate()
                .map(|(index, pair)| (project_on_segment(&point, &pair[0], &pair[1]).0, index))
                .min_by(|(a, _), (b, _)| point.distance_to(a).total_cmp(&point.distance_to(b)))?,
        };

        (point.distance_to(&projected) <= self.margin).then_some((projected, segment_index))
    }
}

impl IntersectionCalculator for LineCalculator {
    fn calc_intersection(&self, point: Point2) -> Option<IntersectionResult> {
        let (projected, segment_index) = self.nearest(point)?;
        Some(IntersectionResult {
            point: projected,
            detail: IntersectionDetail::Line { segment_index },
        })
    }
}
