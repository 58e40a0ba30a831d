//! Stored intersection polylines.

use serde::{Deserialize, Serialize};
use strataview_core::{PolylineEditError, Result};
use tracing::debug;
use uuid::Uuid;

/// A named polyline drawn on the map, in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionPolyline {
    pub id: Uuid,
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Ordered collection of user polylines with JSON persistence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntersectionPolylines {
    polylines: Vec<IntersectionPolyline>,
}

impl IntersectionPolylines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a polyline under a fresh id.
    pub fn add(&mut self, name: impl Into<String>, points: Vec<[f64; 2]>) -> Uuid {
        let id = Uuid::new_v4();
        let name = name.into();
        debug!("Adding polyline {} ({})", name, id);
        self.polylines.push(IntersectionPolyline { id, name, points });
        id
    }

    pub fn update(
        &mut self,
        id: Uuid,
        name: impl Into<String>,
        points: Vec<[f64; 2]>,
    ) -> std::result::Result<(), PolylineEditError> {
        let polyline = self
            .polylines
            .iter_mut()
            .find(|polyline| polyline.id == id)
            .ok_or(PolylineEditError::UnknownPolyline(id))?;
        polyline.name = name.into();
        polyline.points = points;
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.polylines.len();
        self.polylines.retain(|polyline| polyline.id != id);
        self.polylines.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&IntersectionPolyline> {
        self.polylines.iter().find(|polyline| polyline.id == id)
    }

    pub fn polylines(&self) -> &[IntersectionPolyline] {
        &self.polylines
    }

    pub fn len(&self) -> usize {
        self.polylines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polylines.is_empty()
    }

    /// Whether a polyline other than `except` already uses `name`.
    pub fn is_name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.polylines
            .iter()
            .any(|polyline| polyline.name == name && Some(polyline.id) != except)
    }

    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.polylines)?)
    }

    /// Replace the contents with polylines read from `data`. On a decode
    /// error the current contents are kept.
    pub fn populate_from_data(&mut self, data: &str) -> Result<()> {
        self.polylines = serde_json::from_str(data)?;
        Ok(())
    }
}
