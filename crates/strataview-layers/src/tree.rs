//! Item tree
//!
//! Arena of nodes keyed by [`ItemId`]. Parent and manager links are ids, so a
//! subtree can be lifted out as a [`DetachedItem`] and adopted elsewhere,
//! including by another manager.

use std::collections::HashMap;
use std::rc::Rc;
use strataview_core::pubsub::{Outbox, Subscription};
use strataview_core::{ItemId, ManagerId, StructuralError};
use strataview_settings::Config;

use crate::group::{GroupDelegate, GroupKind};
use crate::item::ItemDelegate;
use crate::layer::LayerDelegate;
use crate::manager::ManagerTopic;
use crate::providers::LayerProvider;
use crate::setting::{SettingDelegate, SettingType};
use crate::shared_setting::SharedSettingDelegate;

/// Closed set of item kinds.
#[derive(Debug)]
pub enum ItemKind {
    Group(GroupDelegate),
    Layer(LayerDelegate),
    SharedSetting(SharedSettingDelegate),
}

/// One item of the tree.
#[derive(Debug)]
pub struct Node {
    pub item: ItemDelegate,
    pub kind: ItemKind,
    subscriptions: Vec<Subscription<ManagerTopic>>,
}

impl Node {
    fn new(item: ItemDelegate, kind: ItemKind) -> Self {
        Self {
            item,
            kind,
            subscriptions: Vec::new(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.item.id()
    }

    pub fn as_group(&self) -> Option<&GroupDelegate> {
        match &self.kind {
            ItemKind::Group(group) => Some(group),
            _ => None,
        }
    }

    pub fn as_layer(&self) -> Option<&LayerDelegate> {
        match &self.kind {
            ItemKind::Layer(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn as_shared_setting(&self) -> Option<&SharedSettingDelegate> {
        match &self.kind {
            ItemKind::SharedSetting(shared) => Some(shared),
            _ => None,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ItemKind::Group(_))
    }

    pub fn is_layer(&self) -> bool {
        matches!(self.kind, ItemKind::Layer(_))
    }

    pub fn is_shared_setting(&self) -> bool {
        matches!(self.kind, ItemKind::SharedSetting(_))
    }

    /// The setting of `key`: from the settings context of a layer, or the
    /// wrapped setting of a shared setting of that type.
    pub fn setting(&self, key: SettingType) -> Option<&SettingDelegate> {
        match &self.kind {
            ItemKind::Layer(layer) => layer.context().setting(key),
            ItemKind::SharedSetting(shared) if shared.setting_type() == key => {
                Some(shared.setting())
            }
            _ => None,
        }
    }

    /// Live manager subscriptions held for `topic`.
    pub fn subscription_count(&self, topic: ManagerTopic) -> usize {
        self.subscriptions
            .iter()
            .filter(|s| s.topic() == topic && s.is_active())
            .count()
    }

    pub(crate) fn replace_subscriptions(&mut self, subscriptions: Vec<Subscription<ManagerTopic>>) {
        self.release_subscriptions();
        self.subscriptions = subscriptions;
    }

    pub(crate) fn release_subscriptions(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
    }
}

/// A subtree outside any tree.
#[derive(Debug)]
pub struct DetachedItem {
    root: ItemId,
    nodes: HashMap<ItemId, Node>,
}

impl DetachedItem {
    fn single(item: ItemDelegate, kind: ItemKind) -> Self {
        let root = item.id();
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(item, kind));
        Self { root, nodes }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::single(
            ItemDelegate::new(name),
            ItemKind::Group(GroupDelegate::new(GroupKind::Group)),
        )
    }

    pub fn view(name: impl Into<String>) -> Self {
        Self::single(
            ItemDelegate::new(name),
            ItemKind::Group(GroupDelegate::new(GroupKind::View)),
        )
    }

    pub fn layer(provider: Rc<dyn LayerProvider>, config: &Config) -> Self {
        let name = provider.default_name();
        Self::single(
            ItemDelegate::new(name),
            ItemKind::Layer(LayerDelegate::new(provider, config)),
        )
    }

    pub fn shared_setting(setting_type: SettingType) -> Self {
        Self::single(
            ItemDelegate::new(setting_type.label()),
            ItemKind::SharedSetting(SharedSettingDelegate::new(setting_type)),
        )
    }

    pub fn id(&self) -> ItemId {
        self.root
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.nodes.get(&self.root)
    }

    pub fn name(&self) -> &str {
        self.root_node().map_or("", |node| node.item.name())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn root_node_mut(&mut self) -> Option<&mut Node> {
        self.nodes.get_mut(&self.root)
    }
}

/// Child to insert: a new subtree or an item already in the tree.
#[derive(Debug)]
pub enum ChildSource {
    New(DetachedItem),
    Existing(ItemId),
}

impl From<DetachedItem> for ChildSource {
    fn from(item: DetachedItem) -> Self {
        ChildSource::New(item)
    }
}

impl From<ItemId> for ChildSource {
    fn from(id: ItemId) -> Self {
        ChildSource::Existing(id)
    }
}

/// Arena holding one root group and everything below it.
#[derive(Debug)]
pub struct ItemTree {
    root: ItemId,
    nodes: HashMap<ItemId, Node>,
}

impl ItemTree {
    pub fn new(root_name: impl Into<String>, manager: ManagerId) -> Self {
        let mut item = ItemDelegate::new(root_name);
        item.set_manager(Some(manager));
        let root = item.id();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node::new(item, ItemKind::Group(GroupDelegate::new(GroupKind::Group))),
        );
        Self { root, nodes }
    }

    pub fn root(&self) -> ItemId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: ItemId) -> Result<&Node, StructuralError> {
        self.nodes.get(&id).ok_or(StructuralError::ItemNotFound(id))
    }

    pub fn node_mut(&mut self, id: ItemId) -> Result<&mut Node, StructuralError> {
        self.nodes.get_mut(&id).ok_or(StructuralError::ItemNotFound(id))
    }

    pub fn group(&self, id: ItemId) -> Result<&GroupDelegate, StructuralError> {
        self.node(id)?
            .as_group()
            .ok_or(StructuralError::NotAGroup(id))
    }

    pub fn group_mut(&mut self, id: ItemId) -> Result<&mut GroupDelegate, StructuralError> {
        match &mut self.node_mut(id)?.kind {
            ItemKind::Group(group) => Ok(group),
            _ => Err(StructuralError::NotAGroup(id)),
        }
    }

    pub fn layer(&self, id: ItemId) -> Result<&LayerDelegate, StructuralError> {
        self.node(id)?
            .as_layer()
            .ok_or(StructuralError::NotALayer(id))
    }

    pub fn layer_mut(&mut self, id: ItemId) -> Result<&mut LayerDelegate, StructuralError> {
        match &mut self.node_mut(id)?.kind {
            ItemKind::Layer(layer) => Ok(layer),
            _ => Err(StructuralError::NotALayer(id)),
        }
    }

    pub fn shared_setting(&self, id: ItemId) -> Result<&SharedSettingDelegate, StructuralError> {
        self.node(id)?
            .as_shared_setting()
            .ok_or(StructuralError::NotASharedSetting(id))
    }

    pub fn shared_setting_mut(
        &mut self,
        id: ItemId,
    ) -> Result<&mut SharedSettingDelegate, StructuralError> {
        match &mut self.node_mut(id)?.kind {
            ItemKind::SharedSetting(shared) => Ok(shared),
            _ => Err(StructuralError::NotASharedSetting(id)),
        }
    }

    pub fn children(&self, group: ItemId) -> Result<&[ItemId], StructuralError> {
        Ok(self.group(group)?.children())
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.nodes.get(&id).and_then(|node| node.item.parent())
    }

    /// True if `ancestor` is `id` or lies above it.
    pub fn is_ancestor_or_self(&self, ancestor: ItemId, id: ItemId) -> bool {
        let mut current = Some(id);
        while let Some(candidate) = current {
            if candidate == ancestor {
                return true;
            }
            current = self.parent(candidate);
        }
        false
    }

    /// `id` and every item below it, pre-order.
    pub fn subtree_ids(&self, id: ItemId) -> Vec<ItemId> {
        let mut ids = Vec::new();
        collect_subtree(&self.nodes, id, &mut ids);
        ids
    }

    /// Pre-order search below `group`. Never fails.
    pub fn find_descendant_by_id(&self, group: ItemId, id: ItemId) -> Option<ItemId> {
        let children = self.nodes.get(&group)?.as_group()?.children();
        for child in children {
            if *child == id {
                return Some(id);
            }
            if let Some(found) = self.find_descendant_by_id(*child, id) {
                return Some(found);
            }
        }
        None
    }

    /// Every item below `group` accepted by `predicate`, pre-order.
    pub fn descendant_items<P>(&self, group: ItemId, predicate: P) -> Vec<ItemId>
    where
        P: Fn(&Node) -> bool,
    {
        let mut ids = self.subtree_ids(group);
        ids.retain(|id| {
            *id != group && self.nodes.get(id).is_some_and(|node| predicate(node))
        });
        ids
    }

    /// Children of every group from the parent of `id` up to the root,
    /// nearest level first, accepted by `predicate`.
    ///
    /// Each level's children include the ancestor group the walk came from.
    pub fn ancestor_and_sibling_items<P>(&self, id: ItemId, predicate: P) -> Vec<ItemId>
    where
        P: Fn(&Node) -> bool,
    {
        let mut items = Vec::new();
        let mut level = self.parent(id);
        while let Some(group_id) = level {
            if let Ok(children) = self.children(group_id) {
                items.extend(
                    children
                        .iter()
                        .filter(|child| self.nodes.get(*child).is_some_and(|node| predicate(node))),
                );
            }
            level = self.parent(group_id);
        }
        items
    }

    /// `name`, or `name (n)` with the smallest free `n`, unique in the tree.
    pub fn make_unique_name(&self, name: &str) -> String {
        let taken = |candidate: &str| self.nodes.values().any(|node| node.item.name() == candidate);
        let mut candidate = name.to_string();
        let mut i = 1;
        while taken(&candidate) {
            candidate = format!("{} ({})", name, i);
            i += 1;
        }
        candidate
    }

    /// Lift a subtree out of the tree. Posts CHILDREN on the old parent.
    pub(crate) fn extract(
        &mut self,
        id: ItemId,
        outbox: &mut Outbox,
    ) -> Result<DetachedItem, StructuralError> {
        if id == self.root {
            return Err(StructuralError::RootImmutable);
        }
        let parent = self.parent(id);
        let ids = self.subtree_ids(id);
        if ids.is_empty() {
            return Err(StructuralError::ItemNotFound(id));
        }
        if let Some(parent) = parent {
            self.group_mut(parent)?.remove(id, outbox);
        }
        let mut nodes = HashMap::with_capacity(ids.len());
        for node_id in ids {
            if let Some(node) = self.nodes.remove(&node_id) {
                nodes.insert(node_id, node);
            }
        }
        if let Some(root) = nodes.get_mut(&id) {
            root.item.set_parent(None);
        }
        Ok(DetachedItem { root: id, nodes })
    }

    /// Adopt a subtree under `parent` at `index`. Posts CHILDREN on `parent`.
    pub(crate) fn adopt(
        &mut self,
        parent: ItemId,
        index: usize,
        mut detached: DetachedItem,
        outbox: &mut Outbox,
    ) -> Result<ItemId, StructuralError> {
        let len = self.children(parent)?.len();
        if index > len {
            return Err(StructuralError::InvalidIndex { index, len });
        }
        let id = detached.root;
        if let Some(root) = detached.root_node_mut() {
            root.item.set_parent(Some(parent));
        }
        self.nodes.extend(detached.nodes.drain());
        self.group_mut(parent)?.insert(index, id, outbox)?;
        Ok(id)
    }

    /// Update the manager link of every item in the subtree.
    pub(crate) fn set_manager_transitively(&mut self, id: ItemId, manager: Option<ManagerId>) {
        for node_id in self.subtree_ids(id) {
            if let Some(node) = self.nodes.get_mut(&node_id) {
                node.item.set_manager(manager);
            }
        }
    }
}

fn collect_subtree(nodes: &HashMap<ItemId, Node>, id: ItemId, out: &mut Vec<ItemId>) {
    let Some(node) = nodes.get(&id) else {
        return;
    };
    out.push(id);
    if let Some(group) = node.as_group() {
        for child in group.children() {
            collect_subtree(nodes, *child, out);
        }
    }
}
