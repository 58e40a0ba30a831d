//! Composes hit testing, readout and highlight for one intersection view.
//!
//! ```text
//! pointer ──► IntersectionHandler ──INTERSECTION──► OverlayState
//!                   ▲                                 ├── ReadoutOverlay
//!   LayerDataObjects┘ (from LayerManager data)        └── HighlightOverlay
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use strataview_core::types::{shared, Shared};
use strataview_core::{ItemId, SnapshotExt, Subscription};
use strataview_layers::{LayerData, LayerManager};
use strataview_settings::InteractionSettings;
use tracing::debug;

use crate::calculators::{IntersectionDetail, ReferenceSystem, ShapeData};
use crate::geometry::Point2;
use crate::handler::{IntersectionHandler, IntersectionHit, IntersectionTopic, Intersections};
use crate::layer_objects::{make_layer_data_objects, LayerDataObject};
use crate::overlay::{
    HighlightItem, HighlightMarker, HighlightOverlay, HighlightShape, ReadoutEntry, ReadoutItem,
    ReadoutOverlay,
};
use crate::viewport::Viewport;

struct OverlayState {
    objects: Vec<LayerDataObject>,
    readout: ReadoutOverlay,
    highlight: HighlightOverlay,
}

impl OverlayState {
    fn apply_hits(&mut self, hits: &[IntersectionHit]) {
        let mut highlights = Vec::new();
        let mut readouts = Vec::new();
        for hit in hits {
            let Some(object) = self.objects.iter().find(|object| object.id == hit.id) else {
                continue;
            };
            let shape = match hit.result.polygon() {
                Some(ring) => HighlightShape::Polygon(ring.to_vec()),
                None => HighlightShape::Point(hit.result.point),
            };
            highlights.push(HighlightItem {
                color: object.color.clone(),
                label: object.label.clone(),
                shape,
            });
            readouts.push(ReadoutItem {
                color: object.color.clone(),
                label: object.label.clone(),
                md: if object.is_wellbore { hit.md } else { None },
                polygon_index: hit
                    .result
                    .polygon_index()
                    .map(|index| index + object.polygon_index_offset),
                property: hit.result.property(),
                point: hit.result.point,
            });
        }
        self.highlight.set_items(highlights);
        self.readout.set_items(readouts);
    }
}

/// Pointer interaction of one view.
pub struct InteractionHandler {
    intersections: Rc<IntersectionHandler>,
    state: Shared<OverlayState>,
    viewport: RefCell<Viewport>,
    synced_revision: Cell<Option<u64>>,
    subscription: Subscription<IntersectionTopic>,
}

impl InteractionHandler {
    pub fn new(settings: InteractionSettings, viewport: Viewport) -> Self {
        let state = shared(OverlayState {
            objects: Vec::new(),
            readout: ReadoutOverlay::new(settings.readout_max_items),
            highlight: HighlightOverlay::new(settings.highlight_point_radius),
        });
        let intersections = Rc::new(IntersectionHandler::new(settings));

        let handler: Weak<IntersectionHandler> = Rc::downgrade(&intersections);
        let overlays = Rc::downgrade(&state);
        let subscription = intersections
            .publisher()
            .subscribe(IntersectionTopic::Intersection, move || {
                let (Some(handler), Some(overlays)) = (handler.upgrade(), overlays.upgrade())
                else {
                    return;
                };
                let hits = (*handler).get_snapshot::<Intersections>();
                overlays.borrow_mut().apply_hits(&hits);
            });

        Self {
            intersections,
            state,
            viewport: RefCell::new(viewport),
            synced_revision: Cell::new(None),
            subscription,
        }
    }

    pub fn intersection_handler(&self) -> &Rc<IntersectionHandler> {
        &self.intersections
    }

    /// Register the hit-testable pieces of one layer's data.
    pub fn add_layer(&self, layer_id: ItemId, data: &LayerData) {
        let objects = make_layer_data_objects(layer_id, data);
        for object in &objects {
            self.intersections.add_intersection_item(&object.item);
        }
        debug!("Layer {} contributes {} intersection items", layer_id, objects.len());
        self.state.borrow_mut().objects.extend(objects);
        self.update_reference_system();
    }

    /// Unregister every piece of `layer_id`.
    pub fn remove_layer(&self, layer_id: ItemId) {
        let removed: Vec<LayerDataObject> = {
            let mut state = self.state.borrow_mut();
            let (removed, kept) = std::mem::take(&mut state.objects)
                .into_iter()
                .partition(|object| object.layer_id == layer_id);
            state.objects = kept;
            removed
        };
        for object in &removed {
            self.intersections.remove_intersection_item(&object.id);
        }
        self.update_reference_system();
    }

    /// Layers with registered pieces, in registration order.
    pub fn layer_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = Vec::new();
        for object in &self.state.borrow().objects {
            if !ids.contains(&object.layer_id) {
                ids.push(object.layer_id);
            }
        }
        ids
    }

    pub fn layer_data_objects(&self) -> Vec<LayerDataObject> {
        self.state.borrow().objects.clone()
    }

    /// Re-register the visible layers of `manager` if its data revision
    /// moved since the last sync. Returns whether anything was rebuilt.
    pub fn sync_with_manager(&self, manager: &LayerManager) -> bool {
        let revision = manager.data_revision();
        if self.synced_revision.get() == Some(revision) {
            return false;
        }
        for layer_id in self.layer_ids() {
            self.remove_layer(layer_id);
        }
        for (layer_id, _name, data) in manager.visible_layer_data() {
            self.add_layer(layer_id, &data);
        }
        self.synced_revision.set(Some(revision));
        true
    }

    /// The first wellbore path supplies measured depth for every hit.
    fn update_reference_system(&self) {
        let reference = self.state.borrow().objects.iter().find_map(|object| {
            match (&object.item.data, object.is_wellbore) {
                (ShapeData::WellborePath { path, md_offset }, true) => {
                    Some(ReferenceSystem::new(path.clone(), *md_offset))
                }
                _ => None,
            }
        });
        self.intersections.set_reference_system(reference);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport.borrow().clone()
    }

    /// Change zoom or pan. Highlights hide until the next hit list.
    pub fn rescale(&self, change: impl FnOnce(&mut Viewport)) {
        change(&mut self.viewport.borrow_mut());
        self.state.borrow_mut().highlight.rescale();
    }

    pub fn pointer_move(&self, pixel: Point2) -> Vec<IntersectionHit> {
        let viewport = self.viewport();
        let hits = self.intersections.handle_pointer_move(pixel, &viewport);
        self.state.borrow_mut().highlight.pointer_move();
        hits
    }

    pub fn pointer_down(&self) {
        self.state.borrow_mut().highlight.pointer_down();
    }

    pub fn pointer_up(&self) {
        self.state.borrow_mut().highlight.pointer_up();
    }

    /// The pointer left the view; publish an empty hit list.
    pub fn pointer_leave(&self) {
        self.intersections.clear();
    }

    pub fn hits(&self) -> Vec<IntersectionHit> {
        (*self.intersections).get_snapshot::<Intersections>()
    }

    pub fn readout_visible(&self) -> bool {
        self.state.borrow().readout.is_visible()
    }

    pub fn readout_entries(&self) -> Vec<ReadoutEntry> {
        self.state.borrow().readout.entries()
    }

    pub fn readout_summary(&self) -> Option<String> {
        self.state.borrow().readout.summary()
    }

    pub fn readout_text(&self) -> String {
        self.state.borrow().readout.text()
    }

    pub fn readout_items(&self) -> Vec<ReadoutItem> {
        self.state.borrow().readout.items().to_vec()
    }

    pub fn highlight_visible(&self) -> bool {
        self.state.borrow().highlight.is_visible()
    }

    pub fn highlight_markers(&self) -> Vec<HighlightMarker> {
        let viewport = self.viewport();
        self.state.borrow().highlight.markers(&viewport)
    }

    /// Wellbore hits in the latest list, with their measured depth.
    pub fn wellbore_depths(&self) -> Vec<(String, f64)> {
        self.hits()
            .into_iter()
            .filter_map(|hit| match hit.result.detail {
                IntersectionDetail::WellborePath { md, .. } => Some((hit.id, md)),
                _ => None,
            })
            .collect()
    }
}

impl Drop for InteractionHandler {
    fn drop(&mut self) {
        self.subscription.unsubscribe();
    }
}
