//! Settings resolution across the tree: shared-setting intersections,
//! override application and setting access by item.

use std::rc::Rc;
use strataview_core::pubsub::PublishSubscribe;
use strataview_core::{ItemId, StructuralError};

use super::{Effects, LayerManager};
use crate::context::ContextTopic;
use crate::data::{LayerData, LayerMetadata};
use crate::layer::{LayerStatus, LayerTopic};
use crate::setting::{SettingDelegate, SettingTopic, SettingType, SettingValue};
use crate::shared_setting::intersect_available_values;
use crate::snapshot::SettingsSnapshot;
use crate::tree::{ItemKind, ItemTree, Node};

impl LayerManager {
    /// Set the local value of setting `key` on a layer, or the value of a
    /// shared setting of that type.
    pub fn set_setting_value(
        &self,
        item: ItemId,
        key: SettingType,
        value: impl Into<SettingValue>,
    ) -> Result<(), StructuralError> {
        let value = value.into();
        self.mutate(|tree, fx| {
            let unknown = StructuralError::UnknownSetting {
                item,
                setting: key.label().to_string(),
            };
            let is_layer = match &mut tree.node_mut(item)?.kind {
                ItemKind::Layer(layer) => {
                    if !layer.context_mut().set_value(key, value, &mut fx.outbox) {
                        return Err(unknown);
                    }
                    true
                }
                ItemKind::SharedSetting(shared) if shared.setting_type() == key => {
                    shared.setting_mut().set_value(value, &mut fx.outbox);
                    false
                }
                _ => return Err(unknown),
            };
            if is_layer {
                self.sync_layer_in(tree, item, fx);
            } else {
                fx.settings_changed = true;
            }
            Ok(())
        })
    }

    /// Effective value of setting `key` on `item`.
    pub fn setting_value(&self, item: ItemId, key: SettingType) -> Result<SettingValue, StructuralError> {
        self.with_setting(item, key, |setting| setting.value().clone())
    }

    pub fn available_values(
        &self,
        item: ItemId,
        key: SettingType,
    ) -> Result<Vec<SettingValue>, StructuralError> {
        self.with_setting(item, key, |setting| setting.available_values().to_vec())
    }

    pub fn is_setting_overridden(&self, item: ItemId, key: SettingType) -> Result<bool, StructuralError> {
        self.with_setting(item, key, |setting| setting.is_overridden())
    }

    pub fn is_setting_loading(&self, item: ItemId, key: SettingType) -> Result<bool, StructuralError> {
        self.with_setting(item, key, |setting| setting.is_loading())
    }

    pub fn setting_publisher(
        &self,
        item: ItemId,
        key: SettingType,
    ) -> Result<PublishSubscribe<SettingTopic>, StructuralError> {
        self.with_setting(item, key, |setting| setting.publisher().clone())
    }

    /// Run `f` against setting `key` of `item`.
    pub fn with_setting<R>(
        &self,
        item: ItemId,
        key: SettingType,
        f: impl FnOnce(&SettingDelegate) -> R,
    ) -> Result<R, StructuralError> {
        self.with_tree(|tree| {
            let node = tree.node(item)?;
            let setting = node.setting(key).ok_or_else(|| StructuralError::UnknownSetting {
                item,
                setting: key.label().to_string(),
            })?;
            Ok(f(setting))
        })
    }

    /// Effective values of a layer.
    pub fn layer_settings(&self, layer: ItemId) -> Result<SettingsSnapshot, StructuralError> {
        self.with_tree(|tree| Ok(tree.layer(layer)?.context().values()))
    }

    pub fn layer_status(&self, layer: ItemId) -> Result<LayerStatus, StructuralError> {
        self.with_tree(|tree| Ok(tree.layer(layer)?.status()))
    }

    pub fn layer_data(&self, layer: ItemId) -> Result<Option<Rc<LayerData>>, StructuralError> {
        self.with_tree(|tree| Ok(tree.layer(layer)?.data().cloned()))
    }

    /// Error of the last failed fetch, prefixed with the layer name.
    pub fn layer_error(&self, layer: ItemId) -> Result<Option<String>, StructuralError> {
        self.with_tree(|tree| {
            let node = tree.node(layer)?;
            let delegate = node.as_layer().ok_or(StructuralError::NotALayer(layer))?;
            Ok(delegate.error_message(node.item.name()))
        })
    }

    pub fn layer_generation(&self, layer: ItemId) -> Result<u64, StructuralError> {
        self.with_tree(|tree| Ok(tree.layer(layer)?.generation()))
    }

    pub fn layer_publisher(&self, layer: ItemId) -> Result<PublishSubscribe<LayerTopic>, StructuralError> {
        self.with_tree(|tree| Ok(tree.layer(layer)?.publisher().clone()))
    }

    pub fn context_publisher(
        &self,
        layer: ItemId,
    ) -> Result<PublishSubscribe<ContextTopic>, StructuralError> {
        self.with_tree(|tree| Ok(tree.layer(layer)?.context().publisher().clone()))
    }

    /// Install metadata for the layer's current metadata query, as if it had
    /// been fetched. Returns false when the layer wants no metadata.
    pub fn set_layer_metadata(
        &self,
        layer: ItemId,
        metadata: LayerMetadata,
    ) -> Result<bool, StructuralError> {
        self.mutate(|tree, fx| {
            let installed = tree.layer_mut(layer)?.set_metadata(metadata, &mut fx.outbox);
            if installed {
                self.sync_layer_in(tree, layer, fx);
            }
            Ok(installed)
        })
    }

    /// Fetch the layer's metadata again.
    pub fn refresh_metadata(&self, layer: ItemId) -> Result<(), StructuralError> {
        self.mutate(|tree, fx| {
            tree.layer_mut(layer)?.invalidate_metadata();
            self.sync_layer_in(tree, layer, fx);
            Ok(())
        })
    }

    /// Fetch the layer's data again with unchanged settings.
    pub fn refetch_layer(&self, layer: ItemId) -> Result<(), StructuralError> {
        self.mutate(|tree, fx| {
            tree.layer_mut(layer)?.request_refetch();
            self.sync_layer_in(tree, layer, fx);
            Ok(())
        })
    }

    /// Re-resolve every shared setting and layer.
    pub fn refresh_all(&self) {
        self.mutate(|tree, fx| {
            let root = tree.root();
            for id in tree.descendant_items(root, Node::is_shared_setting) {
                self.recompute_shared_setting_in(tree, id, fx);
            }
            for id in tree.descendant_items(root, Node::is_layer) {
                self.sync_layer_in(tree, id, fx);
            }
        });
    }

    pub(super) fn sync_layer(&self, layer: ItemId) {
        self.mutate(|tree, fx| self.sync_layer_in(tree, layer, fx));
    }

    /// Apply overrides to a layer, then refresh it.
    pub(super) fn sync_layer_in(&self, tree: &mut ItemTree, layer: ItemId, fx: &mut Effects) {
        let overrides = layer_overrides(tree, layer);
        let Ok(delegate) = tree.layer_mut(layer) else {
            return;
        };
        delegate
            .context_mut()
            .set_overridden_values(&overrides, &mut fx.outbox);
        let session = self.session();
        let outcome = delegate.refresh(layer, session.as_ref(), &mut fx.outbox);
        fx.absorb(outcome);
    }

    pub(super) fn recompute_shared_setting(&self, id: ItemId) {
        self.mutate(|tree, fx| self.recompute_shared_setting_in(tree, id, fx));
    }

    /// Intersect the candidate lists of every item below the shared
    /// setting's parent that has a setting of its type.
    pub(super) fn recompute_shared_setting_in(&self, tree: &mut ItemTree, id: ItemId, fx: &mut Effects) {
        let Ok(shared) = tree.shared_setting(id) else {
            return;
        };
        let key = shared.setting_type();
        let Some(parent) = tree.parent(id) else {
            return;
        };
        let contributors = tree.descendant_items(parent, |node| {
            node.id() != id && node.setting(key).is_some()
        });
        let intersection = intersect_available_values(contributors.iter().filter_map(|item| {
            tree.node(*item)
                .ok()
                .and_then(|node| node.setting(key))
                .map(|setting| setting.available_values())
        }));

        let Ok(shared) = tree.shared_setting_mut(id) else {
            return;
        };
        let (available_changed, value_changed) =
            shared.apply_available_values(intersection, &mut fx.outbox);
        if value_changed {
            tracing::debug!("Shared {} fell back to {}", key.label(), shared.setting().value());
        }
        fx.available_changed |= available_changed;
        fx.settings_changed |= value_changed;
    }
}

/// Overrides seen by `layer`: for each of its keys, the value of the nearest
/// shared setting of that type whose value is set.
fn layer_overrides(tree: &ItemTree, layer: ItemId) -> Vec<(SettingType, SettingValue)> {
    let Ok(delegate) = tree.layer(layer) else {
        return Vec::new();
    };
    let keys = delegate.provider().setting_types();
    let mut overrides: Vec<(SettingType, SettingValue)> = Vec::new();
    for shared_id in tree.ancestor_and_sibling_items(layer, Node::is_shared_setting) {
        let Ok(shared) = tree.shared_setting(shared_id) else {
            continue;
        };
        let key = shared.setting_type();
        if !keys.contains(&key) || overrides.iter().any(|(existing, _)| *existing == key) {
            continue;
        }
        if let Some(value) = shared.override_value() {
            overrides.push((key, value.clone()));
        }
    }
    overrides
}
