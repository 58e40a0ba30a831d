//! Structural operations: insert, remove, move and ownership transfer.

use strataview_core::pubsub::Subscription;
use strataview_core::{ItemId, StructuralError};

use super::{Effects, LayerManager, ManagerTopic};
use crate::tree::{ChildSource, DetachedItem, ItemKind, ItemTree};

/// Where a child lands among its new siblings.
#[derive(Debug, Clone, Copy)]
enum Position {
    Start,
    End,
    At(usize),
}

impl Position {
    fn resolve(self, len: usize) -> Result<usize, StructuralError> {
        match self {
            Position::Start => Ok(0),
            Position::End => Ok(len),
            Position::At(index) if index <= len => Ok(index),
            Position::At(index) => Err(StructuralError::InvalidIndex { index, len }),
        }
    }
}

impl LayerManager {
    /// Add `child` as the last child of `parent`.
    ///
    /// An existing item is moved, never duplicated.
    pub fn append_child(
        &self,
        parent: ItemId,
        child: impl Into<ChildSource>,
    ) -> Result<ItemId, StructuralError> {
        self.place(parent, child.into(), Position::End)
    }

    pub fn prepend_child(
        &self,
        parent: ItemId,
        child: impl Into<ChildSource>,
    ) -> Result<ItemId, StructuralError> {
        self.place(parent, child.into(), Position::Start)
    }

    /// Add `child` to `parent` at `index`, which may equal the child count.
    pub fn insert_child(
        &self,
        parent: ItemId,
        child: impl Into<ChildSource>,
        index: usize,
    ) -> Result<ItemId, StructuralError> {
        self.place(parent, child.into(), Position::At(index))
    }

    fn place(
        &self,
        parent: ItemId,
        child: ChildSource,
        position: Position,
    ) -> Result<ItemId, StructuralError> {
        self.mutate(|tree, fx| {
            tree.group(parent)?;
            match child {
                ChildSource::New(mut detached) => {
                    let index = position.resolve(tree.children(parent)?.len())?;
                    if let Some(root) = detached.root_node_mut() {
                        if !root.is_shared_setting() {
                            let unique = tree.make_unique_name(root.item.name());
                            root.item.set_name(unique, &mut fx.outbox);
                        }
                    }
                    let id = tree.adopt(parent, index, detached, &mut fx.outbox)?;
                    tracing::debug!("Adopted {} under {}", id, parent);
                    self.take_ownership(tree, id, fx);
                    Ok(id)
                }
                ChildSource::Existing(id) => {
                    if id == tree.root() {
                        return Err(StructuralError::RootImmutable);
                    }
                    tree.node(id)?;
                    if tree.is_ancestor_or_self(id, parent) {
                        return Err(StructuralError::CycleDetected {
                            item: id,
                            target: parent,
                        });
                    }

                    if tree.parent(id) == Some(parent) {
                        let len = tree.children(parent)?.len() - 1;
                        let index = position.resolve(len)?;
                        let group = tree.group_mut(parent)?;
                        group.take(id);
                        group.insert(index, id, &mut fx.outbox)?;
                        fx.items_changed = true;
                        return Ok(id);
                    }

                    let index = position.resolve(tree.children(parent)?.len())?;
                    self.dispose_ownership(tree, id, fx);
                    let detached = tree.extract(id, &mut fx.outbox)?;
                    let id = tree.adopt(parent, index, detached, &mut fx.outbox)?;
                    tracing::debug!("Moved {} under {}", id, parent);
                    self.take_ownership(tree, id, fx);
                    Ok(id)
                }
            }
        })
    }

    /// Adopt a subtree detached from this or another manager as the last
    /// child of `parent`.
    pub fn attach(&self, parent: ItemId, item: DetachedItem) -> Result<ItemId, StructuralError> {
        self.place(parent, ChildSource::New(item), Position::End)
    }

    /// Remove child `id` of `parent` from the tree and hand it back.
    pub fn remove_child(&self, parent: ItemId, id: ItemId) -> Result<DetachedItem, StructuralError> {
        self.mutate(|tree, fx| {
            tree.group(parent)?;
            if tree.parent(id) != Some(parent) {
                return Err(StructuralError::NotAChild {
                    item: id,
                    group: parent,
                });
            }
            self.detach_in(tree, id, fx)
        })
    }

    /// Remove `id` from wherever it sits in the tree.
    pub fn detach(&self, id: ItemId) -> Result<DetachedItem, StructuralError> {
        self.mutate(|tree, fx| self.detach_in(tree, id, fx))
    }

    fn detach_in(
        &self,
        tree: &mut ItemTree,
        id: ItemId,
        fx: &mut Effects,
    ) -> Result<DetachedItem, StructuralError> {
        if id == tree.root() {
            return Err(StructuralError::RootImmutable);
        }
        tree.node(id)?;
        self.dispose_ownership(tree, id, fx);
        let detached = tree.extract(id, &mut fx.outbox)?;
        tracing::debug!("Detached {} ({} items)", id, detached.len());
        Ok(detached)
    }

    /// Reorder child `id` of `parent` to `index`.
    pub fn move_child(&self, parent: ItemId, id: ItemId, index: usize) -> Result<(), StructuralError> {
        self.mutate(|tree, fx| {
            tree.group_mut(parent)?
                .move_to(id, index, parent, &mut fx.outbox)?;
            fx.items_changed = true;
            Ok(())
        })
    }

    pub fn set_name(&self, id: ItemId, name: impl Into<String>) -> Result<(), StructuralError> {
        self.mutate(|tree, fx| {
            tree.node_mut(id)?.item.set_name(name, &mut fx.outbox);
            Ok(())
        })
    }

    /// Show or hide an item. Hiding a subtree with layer data bumps the data
    /// revision.
    pub fn set_visible(&self, id: ItemId, visible: bool) -> Result<(), StructuralError> {
        self.mutate(|tree, fx| {
            let node = tree.node_mut(id)?;
            if node.item.is_visible() == visible {
                return Ok(());
            }
            node.item.set_visible(visible, &mut fx.outbox);
            fx.data_changed |= subtree_has_data(tree, id);
            Ok(())
        })
    }

    /// Pre-order search below `group`.
    pub fn find_descendant_by_id(&self, group: ItemId, id: ItemId) -> Option<ItemId> {
        self.with_tree(|tree| tree.find_descendant_by_id(group, id))
    }

    pub fn children(&self, group: ItemId) -> Result<Vec<ItemId>, StructuralError> {
        self.with_tree(|tree| tree.children(group).map(<[ItemId]>::to_vec))
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.with_tree(|tree| tree.parent(id))
    }

    pub fn name(&self, id: ItemId) -> Result<String, StructuralError> {
        self.with_node(id, |node| node.item.name().to_string())
    }

    /// Attach the subtree at `id` to this manager.
    ///
    /// Sets manager links, subscribes shared settings and layers to the
    /// manager topics (replacing any earlier subscriptions), then resolves
    /// shared settings and layers against their new surroundings.
    pub(super) fn take_ownership(&self, tree: &mut ItemTree, id: ItemId, fx: &mut Effects) {
        tree.set_manager_transitively(id, Some(self.inner.id));
        let ids = tree.subtree_ids(id);

        for node_id in &ids {
            let subscriptions = match tree.node(*node_id).map(|node| &node.kind) {
                Ok(ItemKind::Layer(_)) => self.layer_subscriptions(*node_id),
                Ok(ItemKind::SharedSetting(_)) => self.shared_setting_subscriptions(*node_id),
                _ => continue,
            };
            if let Ok(node) = tree.node_mut(*node_id) {
                node.replace_subscriptions(subscriptions);
            }
        }

        for node_id in &ids {
            if tree.shared_setting(*node_id).is_ok() {
                self.recompute_shared_setting_in(tree, *node_id, fx);
            }
        }
        for node_id in &ids {
            if tree.layer(*node_id).is_ok() {
                self.sync_layer_in(tree, *node_id, fx);
            }
        }
        fx.items_changed = true;
    }

    /// Release the subtree at `id` from this manager.
    ///
    /// Drops manager subscriptions, abandons fetches in flight and clears
    /// overrides, which only hold while the layer sits under its shared
    /// settings.
    pub(super) fn dispose_ownership(&self, tree: &mut ItemTree, id: ItemId, fx: &mut Effects) {
        fx.data_changed |= subtree_has_data(tree, id);
        for node_id in tree.subtree_ids(id) {
            let Ok(node) = tree.node_mut(node_id) else {
                continue;
            };
            node.release_subscriptions();
            if let ItemKind::Layer(layer) = &mut node.kind {
                fx.cancelled.extend(layer.abandon());
                layer.context_mut().set_overridden_values(&[], &mut fx.outbox);
            }
        }
        tree.set_manager_transitively(id, None);
        fx.items_changed = true;
    }

    fn layer_subscriptions(&self, id: ItemId) -> Vec<Subscription<ManagerTopic>> {
        [ManagerTopic::ItemsChanged, ManagerTopic::SettingsChanged]
            .into_iter()
            .map(|topic| {
                let weak = self.downgrade();
                self.inner.publisher.subscribe(topic, move || {
                    if let Some(manager) = LayerManager::from_weak(&weak) {
                        manager.sync_layer(id);
                    }
                })
            })
            .collect()
    }

    fn shared_setting_subscriptions(&self, id: ItemId) -> Vec<Subscription<ManagerTopic>> {
        [
            ManagerTopic::ItemsChanged,
            ManagerTopic::SettingsChanged,
            ManagerTopic::AvailableSettingsChanged,
        ]
        .into_iter()
        .map(|topic| {
            let weak = self.downgrade();
            self.inner.publisher.subscribe(topic, move || {
                if let Some(manager) = LayerManager::from_weak(&weak) {
                    manager.recompute_shared_setting(id);
                }
            })
        })
        .collect()
    }
}

fn subtree_has_data(tree: &ItemTree, id: ItemId) -> bool {
    tree.subtree_ids(id).into_iter().any(|node_id| {
        tree.layer(node_id)
            .is_ok_and(|layer| layer.data().is_some())
    })
}
