//! Fetched layer data and settings metadata.
//!
//! These mirror the response bodies of the data service closely enough to
//! deserialize with serde, and expose the accessors the interaction engine
//! needs to build hit-testing shapes.

use serde::{Deserialize, Serialize};

/// One section of a grid intersection fence.
///
/// Vertices are `(u, z)` pairs flattened into one buffer. `polys_arr` holds,
/// for each polygon, its vertex count followed by that many vertex indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FenceMeshSection {
    pub vertices_uz_arr: Vec<f64>,
    pub polys_arr: Vec<u32>,
    pub poly_source_cell_indices_arr: Vec<u32>,
    pub poly_props_arr: Vec<f64>,
    pub start_utm_x: f64,
    pub start_utm_y: f64,
    pub end_utm_x: f64,
    pub end_utm_y: f64,
}

impl FenceMeshSection {
    /// Horizontal length of the section.
    pub fn length(&self) -> f64 {
        (self.end_utm_x - self.start_utm_x).hypot(self.end_utm_y - self.start_utm_y)
    }

    /// Number of polygons in the section.
    pub fn polygon_count(&self) -> usize {
        let mut count = 0;
        let mut index = 0;
        while index < self.polys_arr.len() {
            index += self.polys_arr[index] as usize + 1;
            count += 1;
        }
        count
    }
}

/// Grid property sampled along an intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridIntersectionData {
    pub fence_mesh_sections: Vec<FenceMeshSection>,
    pub grid_dimensions: Option<[u32; 3]>,
    pub min_grid_prop_value: f64,
    pub max_grid_prop_value: f64,
    pub min_z: f64,
    pub max_z: f64,
}

/// One surface sampled along an intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceIntersectionLine {
    pub name: String,
    pub z_points: Vec<f64>,
    pub cum_lengths: Vec<f64>,
}

impl SurfaceIntersectionLine {
    /// `(u, z)` points of the line.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.cum_lengths
            .iter()
            .zip(&self.z_points)
            .map(|(u, z)| [*u, *z])
            .collect()
    }
}

/// A filled region between two surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceArea {
    pub name: String,
    /// Closed ring of `(u, z)` points.
    pub ring: Vec<[f64; 2]>,
}

/// Surfaces sampled along an intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceIntersectionData {
    pub lines: Vec<SurfaceIntersectionLine>,
    #[serde(default)]
    pub areas: Vec<SurfaceArea>,
}

/// Formation pick along a wellbore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellborePick {
    pub pick_identifier: String,
    pub md: f64,
    /// `(u, tvd)` position on the intersection.
    pub point: [f64; 2],
}

/// Wellbore trajectory projected onto the intersection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WellborePathData {
    pub wellbore_uuid: String,
    pub unique_wellbore_identifier: String,
    /// `(u, tvd)` points.
    pub points: Vec<[f64; 2]>,
    /// Measured depth at each point.
    pub md_arr: Vec<f64>,
    #[serde(default)]
    pub picks: Vec<WellborePick>,
}

/// Data of a successfully fetched layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerData {
    Grid(GridIntersectionData),
    Surface(SurfaceIntersectionData),
    WellborePath(WellborePathData),
}

/// Property available on a grid model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridPropertyInfo {
    pub property_name: String,
    pub iso_date_or_interval: Option<String>,
}

/// Grid model with its properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridModelInfo {
    pub grid_name: String,
    pub property_info_arr: Vec<GridPropertyInfo>,
}

/// Time dimension of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurfaceTimeType {
    NoTime,
    TimePoint,
    Interval,
}

/// Directory entry of one realization surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceMeta {
    pub name: String,
    pub attribute_name: String,
    pub time_type: SurfaceTimeType,
}

/// Directory of realization surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceMetaSet {
    pub surfaces: Vec<SurfaceMeta>,
    #[serde(default)]
    pub time_points_iso_str: Vec<String>,
    #[serde(default)]
    pub time_intervals_iso_str: Vec<String>,
}

/// Header of a drilled wellbore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellboreHeader {
    pub wellbore_uuid: String,
    pub unique_wellbore_identifier: String,
}

/// Metadata that constrains the available settings values of a layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum LayerMetadata {
    GridModels(Vec<GridModelInfo>),
    Surfaces(SurfaceMetaSet),
    WellboreHeaders(Vec<WellboreHeader>),
}
