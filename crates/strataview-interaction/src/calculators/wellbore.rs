use crate::geometry::Point2;

use super::line::LineCalculator;
use super::reference::ReferenceSystem;
use super::{IntersectionCalculator, IntersectionDetail, IntersectionResult};

/// Line hit test along a wellbore that also reports measured depth.
#[derive(Debug, Clone)]
pub struct WellborePathCalculator {
    line: LineCalculator,
    reference: ReferenceSystem,
}

impl WellborePathCalculator {
    pub fn new(path: Vec<Point2>, md_offset: f64, margin: f64) -> Self {
        Self {
            reference: ReferenceSystem::new(path.clone(), md_offset),
            line: LineCalculator::new(path, margin),
        }
    }

    pub fn reference_system(&self) -> &ReferenceSystem {
        &self.reference
    }
}

impl IntersectionCalculator for WellborePathCalculator {
    fn calc_intersection(&self, point: Point2) -> Option<IntersectionResult> {
        let (projected, segment_index) = self.line.nearest(point)?;
        let md = self.reference.measured_depth(projected)?;
        Some(IntersectionResult {
            point: projected,
            detail: IntersectionDetail::WellborePath { segment_index, md },
        })
    }
}
