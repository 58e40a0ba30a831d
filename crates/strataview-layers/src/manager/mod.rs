//! Layer manager
//!
//! Owns the item tree of one workspace, the query client and the ensemble
//! session. Every mutation runs through [`LayerManager::mutate`]: delegates
//! post notifications into an [`Effects`] buffer while the tree is borrowed,
//! and the buffer is applied after the borrow ends. Listeners can therefore
//! call back into the manager from any notification.
//!
//! Manager-level topics are how items react to changes elsewhere in the tree:
//! shared settings recompute their intersection and layers reapply overrides
//! whenever items, settings or candidate lists change.

mod fetch;
mod settings;
mod structure;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use strataview_core::pubsub::{Outbox, PublishSubscribe, SnapshotSource, Topic};
use strataview_core::{ItemId, ManagerId, StructuralError};
use strataview_settings::Config;

use crate::data::LayerData;
use crate::layer::{FetchRequest, RefreshOutcome};
use crate::providers::{LayerKind, LayerProvider};
use crate::query::{QueryClient, QueryKey, QueryOptions};
use crate::session::EnsembleSession;
use crate::tree::{DetachedItem, ItemTree, Node};

/// Topics published by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerTopic {
    ItemsChanged,
    SettingsChanged,
    AvailableSettingsChanged,
    LayerDataRevision,
}

pub struct ItemsChanged;
impl Topic for ItemsChanged {
    type Key = ManagerTopic;
    type Payload = Vec<ItemId>;
    const KEY: ManagerTopic = ManagerTopic::ItemsChanged;
}

pub struct SettingsChanged;
impl Topic for SettingsChanged {
    type Key = ManagerTopic;
    type Payload = ();
    const KEY: ManagerTopic = ManagerTopic::SettingsChanged;
}

pub struct AvailableSettingsChanged;
impl Topic for AvailableSettingsChanged {
    type Key = ManagerTopic;
    type Payload = ();
    const KEY: ManagerTopic = ManagerTopic::AvailableSettingsChanged;
}

/// Monotonic counter bumped whenever visible layer data changes.
pub struct LayerDataRevision;
impl Topic for LayerDataRevision {
    type Key = ManagerTopic;
    type Payload = u64;
    const KEY: ManagerTopic = ManagerTopic::LayerDataRevision;
}

/// Side effects collected while the tree is borrowed.
#[derive(Debug, Default)]
pub(crate) struct Effects {
    pub outbox: Outbox,
    pub items_changed: bool,
    pub settings_changed: bool,
    pub available_changed: bool,
    pub data_changed: bool,
    pub fetches: Vec<FetchRequest>,
    pub metadata_fetches: Vec<FetchRequest>,
    pub cancelled: Vec<QueryKey>,
}

impl Effects {
    fn absorb(&mut self, outcome: RefreshOutcome) {
        self.settings_changed |= outcome.settings_changed;
        self.available_changed |= outcome.available_changed;
        self.fetches.extend(outcome.data_fetch);
        self.metadata_fetches.extend(outcome.metadata_fetch);
        self.cancelled.extend(outcome.cancelled);
    }
}

pub(crate) struct ManagerInner {
    id: ManagerId,
    tree: RefCell<ItemTree>,
    publisher: PublishSubscribe<ManagerTopic>,
    query_client: Rc<dyn QueryClient>,
    session: RefCell<Rc<dyn EnsembleSession>>,
    config: Config,
    data_revision: Cell<u64>,
}

/// Handle to one workspace's layer tree.
///
/// Cheap to clone; all clones share the same tree.
#[derive(Clone)]
pub struct LayerManager {
    inner: Rc<ManagerInner>,
}

impl LayerManager {
    pub fn new(
        query_client: Rc<dyn QueryClient>,
        session: Rc<dyn EnsembleSession>,
        config: Config,
    ) -> Self {
        let id = ManagerId::new();
        tracing::debug!("Creating layer manager {:?}", id);
        Self {
            inner: Rc::new(ManagerInner {
                id,
                tree: RefCell::new(ItemTree::new("root", id)),
                publisher: PublishSubscribe::new(),
                query_client,
                session: RefCell::new(session),
                config,
                data_revision: Cell::new(0),
            }),
        }
    }

    fn from_weak(weak: &Weak<ManagerInner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn downgrade(&self) -> Weak<ManagerInner> {
        Rc::downgrade(&self.inner)
    }

    pub fn id(&self) -> ManagerId {
        self.inner.id
    }

    /// The root group.
    pub fn root(&self) -> ItemId {
        self.inner.tree.borrow().root()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn publisher(&self) -> &PublishSubscribe<ManagerTopic> {
        &self.inner.publisher
    }

    /// Notify subscribers of `topic` right away.
    pub fn publish(&self, topic: ManagerTopic) {
        self.inner.publisher.notify(topic);
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions::from(&self.inner.config.query)
    }

    pub fn session(&self) -> Rc<dyn EnsembleSession> {
        Rc::clone(&self.inner.session.borrow())
    }

    /// Swap the ensemble session and re-resolve every layer against it.
    pub fn set_session(&self, session: Rc<dyn EnsembleSession>) {
        *self.inner.session.borrow_mut() = session;
        self.refresh_all();
    }

    /// Current value of the layer-data revision counter.
    pub fn data_revision(&self) -> u64 {
        self.inner.data_revision.get()
    }

    /// A detached layer of a built-in kind, named by its kind.
    pub fn create_layer(&self, kind: LayerKind) -> DetachedItem {
        self.create_layer_with(kind.provider())
    }

    pub fn create_layer_with(&self, provider: Rc<dyn LayerProvider>) -> DetachedItem {
        DetachedItem::layer(provider, &self.inner.config)
    }

    /// Run `f` against the tree.
    ///
    /// The tree stays borrowed for the duration of `f`, so `f` must not call
    /// mutating manager methods.
    pub fn with_tree<R>(&self, f: impl FnOnce(&ItemTree) -> R) -> R {
        f(&self.inner.tree.borrow())
    }

    /// Run `f` against one node.
    pub fn with_node<R>(
        &self,
        id: ItemId,
        f: impl FnOnce(&Node) -> R,
    ) -> Result<R, StructuralError> {
        let tree = self.inner.tree.borrow();
        Ok(f(tree.node(id)?))
    }

    /// Live manager subscriptions of item `id` for `topic`.
    pub fn subscription_count(&self, id: ItemId, topic: ManagerTopic) -> usize {
        self.inner
            .tree
            .borrow()
            .node(id)
            .map_or(0, |node| node.subscription_count(topic))
    }

    /// Mutate the tree and apply the collected effects once the borrow ends.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut ItemTree, &mut Effects) -> R) -> R {
        let mut effects = Effects::default();
        let result = {
            let mut tree = self.inner.tree.borrow_mut();
            f(&mut tree, &mut effects)
        };
        self.apply(effects);
        result
    }

    fn apply(&self, effects: Effects) {
        let Effects {
            mut outbox,
            items_changed,
            settings_changed,
            available_changed,
            data_changed,
            fetches,
            metadata_fetches,
            cancelled,
        } = effects;

        for key in &cancelled {
            tracing::debug!("Cancelling query {}", key);
            self.inner.query_client.cancel_query(key);
        }

        let publisher = &self.inner.publisher;
        if items_changed {
            outbox.post(publisher, ManagerTopic::ItemsChanged);
        }
        if settings_changed {
            outbox.post(publisher, ManagerTopic::SettingsChanged);
        }
        if available_changed {
            outbox.post(publisher, ManagerTopic::AvailableSettingsChanged);
        }
        if data_changed {
            self.inner.data_revision.set(self.inner.data_revision.get() + 1);
            outbox.post(publisher, ManagerTopic::LayerDataRevision);
        }

        for request in metadata_fetches {
            self.spawn_metadata_fetch(request);
        }
        for request in fetches {
            self.spawn_data_fetch(request);
        }

        outbox.flush();
    }

    /// Layers in the tree, pre-order.
    pub fn layers(&self) -> Vec<ItemId> {
        let tree = self.inner.tree.borrow();
        tree.descendant_items(tree.root(), Node::is_layer)
    }

    /// Whether `id` and all of its ancestors are visible.
    pub fn is_effectively_visible(&self, id: ItemId) -> bool {
        let tree = self.inner.tree.borrow();
        effectively_visible(&tree, id)
    }

    /// Data of every effectively visible layer that has data, pre-order,
    /// with the layer id and name.
    pub fn visible_layer_data(&self) -> Vec<(ItemId, String, Rc<LayerData>)> {
        let tree = self.inner.tree.borrow();
        tree.descendant_items(tree.root(), Node::is_layer)
            .into_iter()
            .filter(|id| effectively_visible(&tree, *id))
            .filter_map(|id| {
                let node = tree.node(id).ok()?;
                let data = node.as_layer()?.data()?;
                Some((id, node.item.name().to_string(), Rc::clone(data)))
            })
            .collect()
    }
}

fn effectively_visible(tree: &ItemTree, id: ItemId) -> bool {
    let mut current = Some(id);
    while let Some(candidate) = current {
        match tree.node(candidate) {
            Ok(node) if node.item.is_visible() => current = node.item.parent(),
            _ => return false,
        }
    }
    true
}

impl std::fmt::Debug for LayerManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerManager")
            .field("id", &self.inner.id)
            .field("items", &self.inner.tree.borrow().len())
            .field("data_revision", &self.inner.data_revision.get())
            .finish()
    }
}

impl SnapshotSource<ItemsChanged> for LayerManager {
    fn snapshot(&self) -> Vec<ItemId> {
        let tree = self.inner.tree.borrow();
        tree.descendant_items(tree.root(), |_| true)
    }
}

impl SnapshotSource<SettingsChanged> for LayerManager {
    fn snapshot(&self) {}
}

impl SnapshotSource<AvailableSettingsChanged> for LayerManager {
    fn snapshot(&self) {}
}

impl SnapshotSource<LayerDataRevision> for LayerManager {
    fn snapshot(&self) -> u64 {
        self.inner.data_revision.get()
    }
}
