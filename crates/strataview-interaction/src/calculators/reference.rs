use crate::geometry::{project_on_segment, Point2};

/// Nearest position on a curtain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurtainPosition {
    pub point: Point2,
    pub segment_index: usize,
    /// Length along the curtain from its first point.
    pub arc_length: f64,
}

/// Projected wellbore path used to turn view positions into measured depth.
///
/// Measured depth of a position is its arc length along the curtain plus
/// `offset`, the depth of the curtain's first point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSystem {
    curtain: Vec<Point2>,
    cumulative: Vec<f64>,
    offset: f64,
}

impl ReferenceSystem {
    pub fn new(curtain: Vec<Point2>, offset: f64) -> Self {
        let mut cumulative = Vec::with_capacity(curtain.len());
        let mut total = 0.0;
        for (index, point) in curtain.iter().enumerate() {
            if index > 0 {
                total += curtain[index - 1].distance_to(point);
            }
            cumulative.push(total);
        }
        Self {
            curtain,
            cumulative,
            offset,
        }
    }

    pub fn curtain(&self) -> &[Point2] {
        &self.curtain
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Total arc length of the curtain.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn nearest_position(&self, point: Point2) -> Option<CurtainPosition> {
        match self.curtain.as_slice() {
            [] => None,
            [only] => Some(CurtainPosition {
                point: *only,
                segment_index: 0,
                arc_length: 0.0,
            }),
            curtain => curtain
                .windows(2)
                .enumerate()
                .map(|(index, pair)| {
                    let (projected, t) = project_on_segment(&point, &pair[0], &pair[1]);
                    let segment_length = self.cumulative[index + 1] - self.cumulative[index];
                    CurtainPosition {
                        point: projected,
                        segment_index: index,
                        arc_length: self.cumulative[index] + t * segment_length,
                    }
                })
                .min_by(|a, b| {
                    point
                        .distance_to(&a.point)
                        .total_cmp(&point.distance_to(&b.point))
                }),
        }
    }

    /// Measured depth at the curtain position nearest to `point`.
    pub fn measured_depth(&self, point: Point2) -> Option<f64> {
        self.nearest_position(point)
            .map(|position| position.arc_length + self.offset)
    }
}
