//! Pointer hit testing across every registered shape.
//!
//! The handler is shared through `Rc` and takes `&self` everywhere, so
//! INTERSECTION listeners can read the latest hit list while the notify is
//! still running.

use std::cell::RefCell;
use std::fmt;

use strataview_core::types::{shared_vec, SharedVec};
use strataview_core::{PublishSubscribe, SnapshotSource, Topic};
use strataview_settings::InteractionSettings;
use tracing::debug;

use crate::calculators::{
    make_calculator, IntersectionCalculator, IntersectionItem, IntersectionResult,
    ReferenceSystem,
};
use crate::geometry::Point2;
use crate::viewport::Viewport;

/// Topics published by [`IntersectionHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionTopic {
    Intersection,
}

/// Complete hit list of the latest pointer event.
pub struct Intersections;

impl Topic for Intersections {
    type Key = IntersectionTopic;
    type Payload = Vec<IntersectionHit>;
    const KEY: IntersectionTopic = IntersectionTopic::Intersection;
}

/// One hit of one pointer event.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionHit {
    /// Id the shape was registered under.
    pub id: String,
    /// Measured depth of the hit along the view's reference system.
    pub md: Option<f64>,
    pub result: IntersectionResult,
}

struct Registered {
    id: String,
    calculator: Box<dyn IntersectionCalculator>,
}

pub struct IntersectionHandler {
    settings: InteractionSettings,
    calculators: RefCell<Vec<Registered>>,
    reference_system: RefCell<Option<ReferenceSystem>>,
    hits: SharedVec<IntersectionHit>,
    publisher: PublishSubscribe<IntersectionTopic>,
}

impl IntersectionHandler {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            settings,
            calculators: RefCell::new(Vec::new()),
            reference_system: RefCell::new(None),
            hits: shared_vec(),
            publisher: PublishSubscribe::new(),
        }
    }

    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    pub fn publisher(&self) -> &PublishSubscribe<IntersectionTopic> {
        &self.publisher
    }

    /// Register `item`. Re-registering an id replaces its shape and keeps its
    /// place in the evaluation order.
    pub fn add_intersection_item(&self, item: &IntersectionItem) {
        let calculator = make_calculator(&item.data, &self.settings);
        let mut calculators = self.calculators.borrow_mut();
        match calculators.iter_mut().find(|entry| entry.id == item.id) {
            Some(entry) => entry.calculator = calculator,
            None => calculators.push(Registered {
                id: item.id.clone(),
                calculator,
            }),
        }
        debug!("Registered {:?} intersection item {}", item.data.shape(), item.id);
    }

    /// Unregister `id`. Returns false if it was not registered.
    pub fn remove_intersection_item(&self, id: &str) -> bool {
        let mut calculators = self.calculators.borrow_mut();
        let before = calculators.len();
        calculators.retain(|entry| entry.id != id);
        calculators.len() != before
    }

    /// Ids in evaluation order.
    pub fn item_ids(&self) -> Vec<String> {
        self.calculators
            .borrow()
            .iter()
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// Reference system used to give every hit a measured depth.
    pub fn set_reference_system(&self, reference_system: Option<ReferenceSystem>) {
        *self.reference_system.borrow_mut() = reference_system;
    }

    /// Hit test the pointer at `pixel` and publish INTERSECTION.
    ///
    /// The pixel is inverted through `viewport`. A hit is kept when its
    /// reported point projects to within the pixel threshold of the pointer
    /// (strictly). The published list is complete and may be empty.
    pub fn handle_pointer_move(&self, pixel: Point2, viewport: &Viewport) -> Vec<IntersectionHit> {
        let world = viewport.pixel_to_world(pixel);
        let hits: Vec<IntersectionHit> = {
            let calculators = self.calculators.borrow();
            let reference_system = self.reference_system.borrow();
            calculators
                .iter()
                .filter_map(|entry| {
                    let result = entry.calculator.calc_intersection(world)?;
                    let distance = viewport.world_to_pixel(result.point).distance_to(&pixel);
                    (distance < self.settings.threshold_px).then(|| IntersectionHit {
                        id: entry.id.clone(),
                        md: result.md().or_else(|| {
                            reference_system
                                .as_ref()
                                .and_then(|reference| reference.measured_depth(result.point))
                        }),
                        result,
                    })
                })
                .collect()
        };

        *self.hits.borrow_mut() = hits.clone();
        self.publisher.notify(IntersectionTopic::Intersection);
        hits
    }

    /// Publish an empty hit list, e.g. when the pointer leaves the view.
    pub fn clear(&self) {
        self.hits.borrow_mut().clear();
        self.publisher.notify(IntersectionTopic::Intersection);
    }
}

impl SnapshotSource<Intersections> for IntersectionHandler {
    fn snapshot(&self) -> Vec<IntersectionHit> {
        self.hits.borrow().clone()
    }
}

impl fmt::Debug for IntersectionHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntersectionHandler")
            .field("items", &self.calculators.borrow().len())
            .field("hits", &self.hits.borrow().len())
            .finish()
    }
}
