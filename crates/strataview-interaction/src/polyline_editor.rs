//! Interactive drawing of intersection polylines.
//!
//! ```text
//! Inactive ──start──► AddPoints ◄──select──► PointSelected
//!                        │                        │
//!                        └──── finish_points ─────┘
//!                                   ▼
//!                                Naming ──commit──► Inactive
//!                                   │   ──cancel──► Inactive
//!                                   └─back_to_editing─► AddPoints / PointSelected
//! ```
//!
//! Points are added at the end of the polyline while nothing or the last
//! vertex is selected, at the start while the first vertex is selected, and
//! not at all while an interior vertex is selected.

use strataview_core::constants::DEFAULT_VERTEX_PICK_RADIUS_PX;
use strataview_core::PolylineEditError;
use strataview_settings::InteractionSettings;
use tracing::{debug, info};
use uuid::Uuid;

use crate::geometry::Point2;
use crate::polylines::{IntersectionPolyline, IntersectionPolylines};
use crate::viewport::Viewport;

/// Edit state of a [`PolylineEditor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Inactive,
    /// Editing points with no vertex selected.
    AddPoints,
    /// Editing points with the vertex at this index selected.
    PointSelected(usize),
    /// Points are finished; waiting for a name. Keeps the selection for
    /// [`PolylineEditor::back_to_editing`].
    Naming { selected: Option<usize> },
}

impl EditorState {
    /// Returns the name of the state.
    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Inactive => "Inactive",
            EditorState::AddPoints => "AddPoints",
            EditorState::PointSelected(_) => "PointSelected",
            EditorState::Naming { .. } => "Naming",
        }
    }

    fn editing_points(&self) -> bool {
        matches!(self, EditorState::AddPoints | EditorState::PointSelected(_))
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// An existing vertex was hit and selected.
    Selected(usize),
    /// A vertex was added at the end and selected.
    Appended(usize),
    /// A vertex was added at the start and selected.
    Prepended,
    /// An interior vertex is selected, so no point was added.
    Blocked,
    /// Clicks do nothing while naming.
    Ignored,
}

#[derive(Debug, Clone)]
pub struct PolylineEditor {
    state: EditorState,
    points: Vec<Point2>,
    name: String,
    editing_id: Option<Uuid>,
    pick_radius_px: f64,
    hovered: Option<usize>,
    dragging: bool,
}

impl PolylineEditor {
    pub fn new(pick_radius_px: f64) -> Self {
        Self {
            state: EditorState::Inactive,
            points: Vec::new(),
            name: String::new(),
            editing_id: None,
            pick_radius_px,
            hovered: None,
            dragging: false,
        }
    }

    pub fn from_settings(settings: &InteractionSettings) -> Self {
        Self::new(settings.vertex_pick_radius_px)
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state != EditorState::Inactive
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the stored polyline being edited, if this is not a new one.
    pub fn editing_id(&self) -> Option<Uuid> {
        self.editing_id
    }

    pub fn selected(&self) -> Option<usize> {
        match self.state {
            EditorState::PointSelected(index) => Some(index),
            EditorState::Naming { selected } => selected,
            _ => None,
        }
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Begin drawing a new polyline.
    pub fn start(&mut self) {
        self.reset();
        self.state = EditorState::AddPoints;
        debug!("Started drawing a new polyline");
    }

    /// Begin editing a stored polyline. Commit updates it in place.
    pub fn start_editing(&mut self, polyline: &IntersectionPolyline) {
        self.reset();
        self.points = polyline.points.iter().copied().map(Point2::from).collect();
        self.name = polyline.name.clone();
        self.editing_id = Some(polyline.id);
        self.state = EditorState::AddPoints;
        debug!("Started editing polyline {}", polyline.id);
    }

    /// Nearest vertex within the pick radius of `pixel`.
    pub fn vertex_at(&self, pixel: Point2, viewport: &Viewport) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .map(|(index, point)| (index, viewport.world_to_pixel(*point).distance_to(&pixel)))
            .filter(|(_, distance)| *distance <= self.pick_radius_px)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    pub fn click(
        &mut self,
        pixel: Point2,
        viewport: &Viewport,
    ) -> Result<ClickOutcome, PolylineEditError> {
        match self.state {
            EditorState::Inactive => return Err(PolylineEditError::NotEditing),
            EditorState::Naming { .. } => return Ok(ClickOutcome::Ignored),
            _ => {}
        }

        if let Some(index) = self.vertex_at(pixel, viewport) {
            self.state = EditorState::PointSelected(index);
            return Ok(ClickOutcome::Selected(index));
        }

        let world = viewport.pixel_to_world(pixel);
        let last = self.points.len().checked_sub(1);
        match self.selected() {
            None => Ok(self.append(world)),
            Some(index) if Some(index) == last => Ok(self.append(world)),
            Some(0) => {
                self.points.insert(0, world);
                self.state = EditorState::PointSelected(0);
                Ok(ClickOutcome::Prepended)
            }
            Some(_) => Ok(ClickOutcome::Blocked),
        }
    }

    fn append(&mut self, point: Point2) -> ClickOutcome {
        self.points.push(point);
        let index = self.points.len() - 1;
        self.state = EditorState::PointSelected(index);
        ClickOutcome::Appended(index)
    }

    /// Select a vertex, or clear the selection with `None`. Returns false if
    /// points are not being edited or the index is out of range.
    pub fn select(&mut self, index: Option<usize>) -> bool {
        if !self.state.editing_points() {
            return false;
        }
        match index {
            Some(index) if index < self.points.len() => {
                self.state = EditorState::PointSelected(index);
                true
            }
            Some(_) => false,
            None => {
                self.state = EditorState::AddPoints;
                true
            }
        }
    }

    /// Start dragging the selected vertex. Returns false without a selection.
    pub fn begin_drag(&mut self) -> bool {
        self.dragging = self.state.editing_points() && self.selected().is_some();
        self.dragging
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
    }

    /// Move the dragged vertex to the pointer, or track the hovered vertex.
    pub fn pointer_move(&mut self, pixel: Point2, viewport: &Viewport) {
        if !self.state.editing_points() {
            self.hovered = None;
            return;
        }
        match (self.dragging, self.selected()) {
            (true, Some(index)) => {
                if let Some(point) = self.points.get_mut(index) {
                    *point = viewport.pixel_to_world(pixel);
                }
            }
            _ => self.hovered = self.vertex_at(pixel, viewport),
        }
    }

    /// Remove the selected vertex and select the one before it.
    pub fn delete_selected(&mut self) -> Option<Point2> {
        if !self.state.editing_points() {
            return None;
        }
        let index = self.selected()?;
        let removed = self.points.remove(index);
        self.dragging = false;
        self.hovered = None;
        self.state = match index.checked_sub(1) {
            Some(previous) => EditorState::PointSelected(previous),
            None => EditorState::AddPoints,
        };
        Some(removed)
    }

    /// Done placing points; move on to naming.
    pub fn finish_points(&mut self) -> Result<(), PolylineEditError> {
        match self.state {
            EditorState::Inactive => Err(PolylineEditError::NotEditing),
            EditorState::Naming { .. } => Ok(()),
            _ => {
                self.state = EditorState::Naming {
                    selected: self.selected(),
                };
                self.dragging = false;
                Ok(())
            }
        }
    }

    pub fn back_to_editing(&mut self) -> Result<(), PolylineEditError> {
        match self.state {
            EditorState::Naming { selected } => {
                self.state = match selected {
                    Some(index) => EditorState::PointSelected(index),
                    None => EditorState::AddPoints,
                };
                Ok(())
            }
            _ => Err(PolylineEditError::NotNaming),
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Store the polyline and return to [`EditorState::Inactive`].
    ///
    /// A new polyline is added; an edited one is updated in place. On error
    /// the editor stays in [`EditorState::Naming`].
    pub fn commit(
        &mut self,
        store: &mut IntersectionPolylines,
    ) -> Result<Uuid, PolylineEditError> {
        if !matches!(self.state, EditorState::Naming { .. }) {
            return Err(PolylineEditError::NotNaming);
        }
        if self.points.len() < 2 {
            return Err(PolylineEditError::TooFewPoints {
                count: self.points.len(),
            });
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(PolylineEditError::EmptyName);
        }
        if store.is_name_taken(name, self.editing_id) {
            return Err(PolylineEditError::DuplicateName(name.to_string()));
        }

        let points: Vec<[f64; 2]> = self.points.iter().copied().map(Into::into).collect();
        let id = match self.editing_id {
            Some(id) => {
                store.update(id, name, points)?;
                id
            }
            None => store.add(name, points),
        };
        info!("Committed polyline '{}' with {} points", name, self.points.len());
        self.reset();
        Ok(id)
    }

    /// Discard the edit.
    pub fn cancel(&mut self) {
        if self.is_active() {
            debug!("Polyline edit cancelled");
        }
        self.reset();
    }

    /// Hint shown next to the pointer while editing points.
    pub fn tooltip(&self) -> Option<&'static str> {
        if !self.state.editing_points() {
            return None;
        }
        let last = self.points.len().checked_sub(1);
        Some(match self.selected() {
            None if self.points.is_empty() => "Click on map to add first point to polyline",
            None => "Click on map to add new point to end of polyline",
            Some(index) if Some(index) == last => "Click on map to add new point to end of polyline",
            Some(0) => "Click on map to add new point to start of polyline",
            Some(_) => "Select either end of polyline to add new point",
        })
    }

    fn reset(&mut self) {
        self.state = EditorState::Inactive;
        self.points.clear();
        self.name.clear();
        self.editing_id = None;
        self.hovered = None;
        self.dragging = false;
    }
}

impl Default for PolylineEditor {
    fn default() -> Self {
        Self::new(DEFAULT_VERTEX_PICK_RADIUS_PX)
    }
}
