//! Per-shape hit testing.
//!
//! Each registered [`IntersectionItem`] gets one [`IntersectionCalculator`]
//! built by [`make_calculator`]. Calculators work in world coordinates and
//! are immutable once built; the handler re-evaluates them on every pointer
//! event.

mod line;
mod point;
mod polygon;
mod polygon_soup;
mod reference;
mod wellbore;

pub use line::LineCalculator;
pub use point::PointCalculator;
pub use polygon::{point_in_polygon, PolygonCalculator};
pub use polygon_soup::{PolygonSoupCalculator, PolygonSoupData};
pub use reference::{CurtainPosition, ReferenceSystem};
pub use wellbore::WellborePathCalculator;

use serde::{Deserialize, Serialize};
use strataview_settings::InteractionSettings;

use crate::geometry::Point2;

/// Kind of a hit-testable shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Point,
    Line,
    Polygon,
    PolygonSoup,
    WellborePath,
}

/// Geometry of a hit-testable item, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeData {
    Point(Point2),
    Line(Vec<Point2>),
    /// Single ring; the closing edge is implied.
    Polygon(Vec<Point2>),
    PolygonSoup(PolygonSoupData),
    /// Trajectory whose hits carry a measured depth.
    WellborePath {
        path: Vec<Point2>,
        md_offset: f64,
    },
}

impl ShapeData {
    pub fn shape(&self) -> Shape {
        match self {
            ShapeData::Point(_) => Shape::Point,
            ShapeData::Line(_) => Shape::Line,
            ShapeData::Polygon(_) => Shape::Polygon,
            ShapeData::PolygonSoup(_) => Shape::PolygonSoup,
            ShapeData::WellborePath { .. } => Shape::WellborePath,
        }
    }
}

/// A shape registered with the intersection handler under a unique id.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionItem {
    pub id: String,
    pub data: ShapeData,
}

impl IntersectionItem {
    pub fn new(id: impl Into<String>, data: ShapeData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Shape-specific part of a hit.
#[derive(Debug, Clone, PartialEq)]
pub enum IntersectionDetail {
    Point,
    Line {
        segment_index: usize,
    },
    Polygon {
        polygon: Vec<Point2>,
    },
    PolygonSoup {
        polygon_index: usize,
        property: Option<f64>,
        polygon: Vec<Point2>,
    },
    WellborePath {
        segment_index: usize,
        md: f64,
    },
}

/// A successful hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionResult {
    /// Point the hit is reported at: the shape point for points, the
    /// projection for lines, the query point for polygons.
    pub point: Point2,
    pub detail: IntersectionDetail,
}

impl IntersectionResult {
    pub fn shape(&self) -> Shape {
        match self.detail {
            IntersectionDetail::Point => Shape::Point,
            IntersectionDetail::Line { .. } => Shape::Line,
            IntersectionDetail::Polygon { .. } => Shape::Polygon,
            IntersectionDetail::PolygonSoup { .. } => Shape::PolygonSoup,
            IntersectionDetail::WellborePath { .. } => Shape::WellborePath,
        }
    }

    /// Measured depth carried by wellbore hits.
    pub fn md(&self) -> Option<f64> {
        match self.detail {
            IntersectionDetail::WellborePath { md, .. } => Some(md),
            _ => None,
        }
    }

    pub fn polygon_index(&self) -> Option<usize> {
        match self.detail {
            IntersectionDetail::PolygonSoup { polygon_index, .. } => Some(polygon_index),
            _ => None,
        }
    }

    pub fn property(&self) -> Option<f64> {
        match self.detail {
            IntersectionDetail::PolygonSoup { property, .. } => property,
            _ => None,
        }
    }

    /// Ring of the polygon that was hit, if any.
    pub fn polygon(&self) -> Option<&[Point2]> {
        match &self.detail {
            IntersectionDetail::Polygon { polygon } => Some(polygon),
            IntersectionDetail::PolygonSoup { polygon, .. } => Some(polygon),
            _ => None,
        }
    }
}

/// Hit test of one shape against a world-space query point.
pub trait IntersectionCalculator {
    fn calc_intersection(&self, point: Point2) -> Option<IntersectionResult>;
}

/// Build the calculator for `data`, taking margins from `settings`.
pub fn make_calculator(
    data: &ShapeData,
    settings: &InteractionSettings,
) -> Box<dyn IntersectionCalculator> {
    match data {
        ShapeData::Point(point) => Box::new(PointCalculator::new(*point, settings.point_margin)),
        ShapeData::Line(points) => {
            Box::new(LineCalculator::new(points.clone(), settings.line_margin))
        }
        ShapeData::Polygon(ring) => Box::new(PolygonCalculator::new(ring.clone())),
        ShapeData::PolygonSoup(soup) => Box::new(PolygonSoupCalculator::new(soup.clone())),
        ShapeData::WellborePath { path, md_offset } => Box::new(WellborePathCalculator::new(
            path.clone(),
            *md_offset,
            settings.line_margin,
        )),
    }
}
