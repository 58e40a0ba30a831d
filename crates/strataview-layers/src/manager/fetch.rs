//! Fetch execution.
//!
//! Queries run as local tasks on the current `LocalSet`; completions find the
//! manager again through a weak handle and are applied by generation.

use std::rc::Rc;
use strataview_core::FetchError;

use super::LayerManager;
use crate::layer::{Completion, FetchRequest, LayerStatus};
use crate::tree::ItemKind;

impl LayerManager {
    pub(super) fn spawn_data_fetch(&self, request: FetchRequest) {
        tracing::debug!("Fetching {} (generation {})", request.key, request.generation);
        let client = Rc::clone(&self.inner.query_client);
        let options = self.query_options();
        let weak = self.downgrade();
        tokio::task::spawn_local(async move {
            let result = client.fetch_query(request.key.clone(), options).await;
            if let Some(manager) = LayerManager::from_weak(&weak) {
                manager.complete_data_fetch(request, result);
            }
        });
    }

    pub(super) fn spawn_metadata_fetch(&self, request: FetchRequest) {
        tracing::debug!("Fetching metadata {}", request.key);
        let client = Rc::clone(&self.inner.query_client);
        let options = self.query_options();
        let weak = self.downgrade();
        tokio::task::spawn_local(async move {
            let result = client.fetch_query(request.key.clone(), options).await;
            if let Some(manager) = LayerManager::from_weak(&weak) {
                manager.complete_metadata_fetch(request, result);
            }
        });
    }

    fn complete_data_fetch(
        &self,
        request: FetchRequest,
        result: Result<serde_json::Value, FetchError>,
    ) {
        self.mutate(|tree, fx| {
            let Ok(node) = tree.node_mut(request.layer) else {
                tracing::debug!("Dropping result of {} for a removed layer", request.key);
                return;
            };
            let name = node.item.name().to_string();
            let ItemKind::Layer(layer) = &mut node.kind else {
                return;
            };
            match layer.complete_fetch(request.generation, result, &mut fx.outbox) {
                Completion::Stale => {
                    tracing::debug!(
                        "Discarding stale result of {} (generation {}, current {})",
                        request.key,
                        request.generation,
                        layer.generation()
                    );
                }
                Completion::Applied => match layer.status() {
                    LayerStatus::Success => {
                        tracing::info!("Loaded data for layer {}", name);
                        fx.data_changed = true;
                    }
                    LayerStatus::Error => {
                        if let Some(message) = layer.error_message(&name) {
                            tracing::warn!("{}", message);
                        }
                    }
                    status => {
                        tracing::debug!("Fetch for layer {} ended as {}", name, status);
                    }
                },
            }
        });
    }

    fn complete_metadata_fetch(
        &self,
        request: FetchRequest,
        result: Result<serde_json::Value, FetchError>,
    ) {
        self.mutate(|tree, fx| {
            let Ok(node) = tree.node_mut(request.layer) else {
                return;
            };
            let name = node.item.name().to_string();
            let ItemKind::Layer(layer) = &mut node.kind else {
                return;
            };
            match layer.complete_metadata(request.generation, result, &mut fx.outbox) {
                Completion::Stale => {
                    tracing::debug!("Discarding stale metadata {}", request.key);
                }
                Completion::Applied if layer.metadata().is_some() => {
                    self.sync_layer_in(tree, request.layer, fx);
                }
                Completion::Applied => {
                    if let Some(message) = layer.error_message(&name) {
                        tracing::warn!("Metadata query failed: {}", message);
                    }
                }
            }
        });
    }
}
