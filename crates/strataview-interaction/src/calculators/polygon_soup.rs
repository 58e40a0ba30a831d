use crate::geometry::{BoundingBox, Point2};

use super::polygon::point_in_polygon;
use super::{IntersectionCalculator, IntersectionDetail, IntersectionResult};

/// Many polygons sharing one vertex buffer, as produced by slicing a grid.
///
/// `vertices` holds `(x, y)` pairs with x relative to `x_min`. `polygons`
/// holds, for each polygon, its vertex count followed by that many vertex
/// indices. `properties` holds one value per polygon.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonSoupData {
    pub vertices: Vec<f64>,
    pub polygons: Vec<u32>,
    pub properties: Vec<f64>,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PolygonSoupData {
    /// Vertex-index slices of every polygon, walking the count prefixes.
    /// Stops at a truncated entry.
    pub fn polygon_indices(&self) -> impl Iterator<Item = &[u32]> + '_ {
        let mut cursor = 0;
        std::iter::from_fn(move || {
            let count = *self.polygons.get(cursor)? as usize;
            let indices = self.polygons.get(cursor + 1..cursor + 1 + count)?;
            cursor += count + 1;
            Some(indices)
        })
    }

    /// World-space ring of one polygon, or `None` if it references a vertex
    /// outside the buffer.
    pub fn ring(&self, indices: &[u32]) -> Option<Vec<Point2>> {
        indices
            .iter()
            .map(|&index| {
                let at = index as usize * 2;
                let x = *self.vertices.get(at)?;
                let y = *self.vertices.get(at + 1)?;
                Some(Point2::new(self.x_min + x, y))
            })
            .collect()
    }
}

/// Reports the first polygon of a soup containing the query point.
#[derive(Debug, Clone)]
pub struct PolygonSoupCalculator {
    data: PolygonSoupData,
    bounds: BoundingBox,
}

impl PolygonSoupCalculator {
    pub fn new(data: PolygonSoupData) -> Self {
        let bounds = BoundingBox::new(
            Point2::new(data.x_min, data.y_min),
            Point2::new(data.x_max, data.y_max),
        );
        Self { data, bounds }
    }
}

impl IntersectionCalculator for PolygonSoupCalculator {
    fn calc_intersection(&self, point: Point2) -> Option<IntersectionResult> {
        if !self.bounds.contains(&point) {
            return None;
        }

        self.data
            .polygon_indices()
            .enumerate()
            .find_map(|(polygon_index, indices)| {
                let ring = self.data.ring(indices)?;
                point_in_polygon(&point, &ring).then(|| IntersectionResult {
                    point,
                    detail: IntersectionDetail::PolygonSoup {
                        polygon_index,
                        property: self.data.properties.get(polygon_index).copied(),
                        polygon: ring,
                    },
                })
            })
    }
}
