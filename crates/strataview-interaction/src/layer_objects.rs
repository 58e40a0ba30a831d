//! Bridge from fetched layer data to hit-testable items.
//!
//! Every piece of a layer's data that can be hovered becomes one
//! [`LayerDataObject`]: surface lines and areas, grid fence sections,
//! wellbore paths and their picks.

use strataview_core::ItemId;
use strataview_layers::{
    FenceMeshSection, GridIntersectionData, LayerData, SurfaceIntersectionData, WellborePathData,
};

use crate::calculators::{IntersectionItem, PolygonSoupData, ShapeData};
use crate::geometry::Point2;

const SURFACE_COLORS: [&str; 6] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b",
];
const GRID_SECTION_COLOR: &str = "rgba(0, 0, 255, 0.25)";
const WELLBORE_COLOR: &str = "black";
const PICK_COLOR: &str = "rgb(255, 0, 0)";

/// A hit-testable piece of one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDataObject {
    /// Registration id with the intersection handler; same as `item.id`.
    pub id: String,
    pub layer_id: ItemId,
    pub item: IntersectionItem,
    pub color: String,
    pub label: String,
    /// Hits on wellbores show their measured depth.
    pub is_wellbore: bool,
    /// Added to polygon indices of this object so they number cells across
    /// every section of a grid layer.
    pub polygon_index_offset: usize,
}

impl LayerDataObject {
    fn new(layer_id: ItemId, id: String, data: ShapeData, color: &str, label: String) -> Self {
        Self {
            item: IntersectionItem::new(id.clone(), data),
            id,
            layer_id,
            color: color.to_string(),
            label,
            is_wellbore: false,
            polygon_index_offset: 0,
        }
    }
}

/// Hit-testable objects of one layer's data.
pub fn make_layer_data_objects(layer_id: ItemId, data: &LayerData) -> Vec<LayerDataObject> {
    match data {
        LayerData::Surface(surface) => surface_objects(layer_id, surface),
        LayerData::Grid(grid) => grid_objects(layer_id, grid),
        LayerData::WellborePath(wellbore) => wellbore_objects(layer_id, wellbore),
    }
}

fn points(raw: &[[f64; 2]]) -> Vec<Point2> {
    raw.iter().copied().map(Point2::from).collect()
}

fn surface_objects(layer_id: ItemId, surface: &SurfaceIntersectionData) -> Vec<LayerDataObject> {
    let lines = surface.lines.iter().enumerate().map(|(index, line)| {
        LayerDataObject::new(
            layer_id,
            format!("{}-line-{}", layer_id.as_uuid(), index),
            ShapeData::Line(points(&line.points())),
            SURFACE_COLORS[index % SURFACE_COLORS.len()],
            line.name.clone(),
        )
    });
    let areas = surface.areas.iter().enumerate().map(|(index, area)| {
        LayerDataObject::new(
            layer_id,
            format!("{}-area-{}", layer_id.as_uuid(), index),
            ShapeData::Polygon(points(&area.ring)),
            SURFACE_COLORS[index % SURFACE_COLORS.len()],
            area.name.clone(),
        )
    });
    lines.chain(areas).collect()
}

fn section_soup(
    section: &FenceMeshSection,
    start_u: f64,
    grid: &GridIntersectionData,
) -> PolygonSoupData {
    PolygonSoupData {
        vertices: section.vertices_uz_arr.clone(),
        polygons: section.polys_arr.clone(),
        properties: section.poly_props_arr.clone(),
        x_min: start_u,
        x_max: start_u + section.length(),
        y_min: grid.min_z,
        y_max: grid.max_z,
    }
}

/// Sections are laid out end to end along `u`.
fn grid_objects(layer_id: ItemId, grid: &GridIntersectionData) -> Vec<LayerDataObject> {
    let mut start_u = 0.0;
    let mut cell_offset = 0;
    grid.fence_mesh_sections
        .iter()
        .enumerate()
        .map(|(index, section)| {
            let mut object = LayerDataObject::new(
                layer_id,
                format!("{}-{}", layer_id.as_uuid(), index),
                ShapeData::PolygonSoup(section_soup(section, start_u, grid)),
                GRID_SECTION_COLOR,
                format!("Fence mesh section {}", index + 1),
            );
            object.polygon_index_offset = cell_offset;
            start_u += section.length();
            cell_offset += section.polygon_count();
            object
        })
        .collect()
}

fn wellbore_objects(layer_id: ItemId, wellbore: &WellborePathData) -> Vec<LayerDataObject> {
    let mut path = LayerDataObject::new(
        layer_id,
        layer_id.as_uuid().to_string(),
        ShapeData::WellborePath {
            path: points(&wellbore.points),
            md_offset: wellbore.md_arr.first().copied().unwrap_or(0.0),
        },
        WELLBORE_COLOR,
        wellbore.unique_wellbore_identifier.clone(),
    );
    path.is_wellbore = true;

    let picks = wellbore.picks.iter().enumerate().map(|(index, pick)| {
        LayerDataObject::new(
            layer_id,
            format!("{}-pick-{}", layer_id.as_uuid(), index),
            ShapeData::Point(Point2::from(pick.point)),
            PICK_COLOR,
            pick.pick_identifier.clone(),
        )
    });
    std::iter::once(path).chain(picks).collect()
}
