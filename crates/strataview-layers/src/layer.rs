//! Layer delegate
//!
//! Owns the settings context of one layer and its data-fetch lifecycle:
//!
//! ```text
//! Idle ──▶ Loading ──▶ Success | Error
//!            ▲              │
//!            └── refetch ◀──┘
//! any ──(invalid settings)──▶ InvalidSettings
//! ```
//!
//! Every fetch is tagged with the layer's generation. Completions carrying an
//! older generation are stale and must not touch status or data.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use strataview_core::pubsub::{Outbox, PublishSubscribe, SnapshotSource, Topic};
use strataview_core::{FetchError, ItemId};
use strataview_settings::Config;

use crate::context::SettingsContextDelegate;
use crate::data::{LayerData, LayerMetadata};
use crate::providers::LayerProvider;
use crate::query::QueryKey;
use crate::session::EnsembleSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum LayerStatus {
    #[default]
    Idle,
    Loading,
    Error,
    Success,
    InvalidSettings,
}

impl fmt::Display for LayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LayerStatus::Idle => "idle",
            LayerStatus::Loading => "loading",
            LayerStatus::Error => "error",
            LayerStatus::Success => "success",
            LayerStatus::InvalidSettings => "invalid settings",
        };
        f.write_str(label)
    }
}

/// Topics published by a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerTopic {
    Status,
    Data,
}

pub struct StatusChanged;
impl Topic for StatusChanged {
    type Key = LayerTopic;
    type Payload = LayerStatus;
    const KEY: LayerTopic = LayerTopic::Status;
}

pub struct DataChanged;
impl Topic for DataChanged {
    type Key = LayerTopic;
    type Payload = Option<Rc<LayerData>>;
    const KEY: LayerTopic = LayerTopic::Data;
}

/// A query the manager should issue for a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub layer: ItemId,
    pub key: QueryKey,
    pub generation: u64,
}

/// Requests produced by one [`LayerDelegate::refresh`].
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    pub settings_changed: bool,
    pub available_changed: bool,
    pub data_fetch: Option<FetchRequest>,
    pub metadata_fetch: Option<FetchRequest>,
    pub cancelled: Vec<QueryKey>,
}

/// What a completion did to the layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The completion belonged to a superseded fetch.
    Stale,
    Applied,
}

pub struct LayerDelegate {
    provider: Rc<dyn LayerProvider>,
    context: SettingsContextDelegate,
    status: LayerStatus,
    data: Option<Rc<LayerData>>,
    error: Option<FetchError>,
    generation: u64,
    query_keys: Vec<QueryKey>,
    refetch_pending: bool,
    metadata: Option<(QueryKey, LayerMetadata)>,
    metadata_key: Option<QueryKey>,
    metadata_generation: u64,
    publisher: PublishSubscribe<LayerTopic>,
}

impl LayerDelegate {
    pub fn new(provider: Rc<dyn LayerProvider>, config: &Config) -> Self {
        let context = SettingsContextDelegate::new(provider.as_ref(), config);
        Self {
            provider,
            context,
            status: LayerStatus::Idle,
            data: None,
            error: None,
            generation: 0,
            query_keys: Vec::new(),
            refetch_pending: true,
            metadata: None,
            metadata_key: None,
            metadata_generation: 0,
            publisher: PublishSubscribe::new(),
        }
    }

    pub fn provider(&self) -> &Rc<dyn LayerProvider> {
        &self.provider
    }

    pub fn context(&self) -> &SettingsContextDelegate {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut SettingsContextDelegate {
        &mut self.context
    }

    pub fn status(&self) -> LayerStatus {
        self.status
    }

    pub fn data(&self) -> Option<&Rc<LayerData>> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Error detail prefixed with the layer name.
    pub fn error_message(&self, name: &str) -> Option<String> {
        self.error.as_ref().map(|error| format!("{}: {}", name, error))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn query_keys(&self) -> &[QueryKey] {
        &self.query_keys
    }

    pub fn metadata(&self) -> Option<&LayerMetadata> {
        self.metadata.as_ref().map(|(_, metadata)| metadata)
    }

    /// Key of the metadata query the layer currently wants.
    pub fn metadata_key(&self) -> Option<&QueryKey> {
        self.metadata_key.as_ref()
    }

    pub fn publisher(&self) -> &PublishSubscribe<LayerTopic> {
        &self.publisher
    }

    /// Record the key of the fetch in flight.
    pub fn register_query_key(&mut self, key: QueryKey) {
        self.query_keys.push(key);
    }

    fn set_status(&mut self, status: LayerStatus, outbox: &mut Outbox) {
        if self.status == status {
            return;
        }
        self.status = status;
        outbox.post(&self.publisher, LayerTopic::Status);
    }

    /// Bring the layer in line with its current settings.
    ///
    /// Runs fixup and change detection, requests metadata when the metadata
    /// query changed, and decides whether a data fetch is due. Queries are
    /// returned to the caller, which owns the query client.
    pub fn refresh(
        &mut self,
        layer: ItemId,
        session: &dyn EnsembleSession,
        outbox: &mut Outbox,
    ) -> RefreshOutcome {
        let mut outcome = RefreshOutcome::default();
        let provider = Rc::clone(&self.provider);

        let stored = self.metadata.as_ref().map(|(key, metadata)| (key, metadata));
        outcome.available_changed = self.context.fixup(provider.as_ref(), session, stored, outbox);

        let change = self.context.detect_change(provider.as_ref(), outbox);
        outcome.settings_changed = change.changed;
        if change.refetch_required {
            self.refetch_pending = true;
        }

        let values = self.context.values();
        let wanted = provider.metadata_query(&values);
        if wanted != self.metadata_key {
            self.metadata_generation += 1;
            self.metadata = None;
            self.metadata_key = wanted.clone();
            match wanted {
                Some(key) => {
                    self.context
                        .set_loading(provider.metadata_settings(), true, outbox);
                    outcome.metadata_fetch = Some(FetchRequest {
                        layer,
                        key,
                        generation: self.metadata_generation,
                    });
                }
                None => {
                    self.context
                        .set_loading(provider.metadata_settings(), false, outbox);
                }
            }
        }

        if !provider.are_settings_valid(&values) {
            if self.status != LayerStatus::InvalidSettings || !self.query_keys.is_empty() {
                self.generation += 1;
                outcome.cancelled.append(&mut self.query_keys);
                self.set_status(LayerStatus::InvalidSettings, outbox);
            }
            self.refetch_pending = true;
            return outcome;
        }

        if self.refetch_pending && !self.context.is_loading() {
            outcome.cancelled.append(&mut self.query_keys);
            self.generation += 1;
            self.refetch_pending = false;
            self.error = None;
            let key = provider.data_query(&values);
            self.register_query_key(key.clone());
            self.set_status(LayerStatus::Loading, outbox);
            outcome.data_fetch = Some(FetchRequest {
                layer,
                key,
                generation: self.generation,
            });
        } else if self.refetch_pending {
            // The fetch goes out once metadata arrives; anything in flight
            // now answers for superseded settings.
            if change.refetch_required {
                self.generation += 1;
                outcome.cancelled.append(&mut self.query_keys);
            }
            match self.status {
                LayerStatus::InvalidSettings => self.set_status(LayerStatus::Idle, outbox),
                LayerStatus::Success | LayerStatus::Error if change.refetch_required => {
                    self.set_status(LayerStatus::Loading, outbox)
                }
                _ => {}
            }
        }

        outcome
    }

    /// Apply the result of the data fetch tagged `generation`.
    pub fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<serde_json::Value, FetchError>,
        outbox: &mut Outbox,
    ) -> Completion {
        if generation != self.generation {
            return Completion::Stale;
        }
        self.query_keys.clear();

        match result.and_then(|value| self.provider.decode_data(value)) {
            Ok(data) => {
                self.data = Some(Rc::new(data));
                self.error = None;
                outbox.post(&self.publisher, LayerTopic::Data);
                self.set_status(LayerStatus::Success, outbox);
            }
            Err(FetchError::Cancelled) => {
                self.refetch_pending = true;
                self.set_status(LayerStatus::Idle, outbox);
            }
            Err(error) => {
                self.error = Some(error);
                self.set_status(LayerStatus::Error, outbox);
            }
        }
        Completion::Applied
    }

    /// Apply the result of the metadata fetch tagged `generation`.
    ///
    /// Returns [`Completion::Stale`] for superseded requests. A failed
    /// metadata query is recorded as the layer error.
    pub fn complete_metadata(
        &mut self,
        generation: u64,
        result: Result<serde_json::Value, FetchError>,
        outbox: &mut Outbox,
    ) -> Completion {
        if generation != self.metadata_generation {
            return Completion::Stale;
        }
        let Some(key) = self.metadata_key.clone() else {
            return Completion::Stale;
        };
        match result.and_then(|value| self.provider.decode_metadata(value)) {
            Ok(metadata) => {
                self.store_metadata(key, metadata, outbox);
            }
            Err(error) => {
                self.context
                    .set_loading(self.provider.metadata_settings(), false, outbox);
                self.error = Some(error);
                self.set_status(LayerStatus::Error, outbox);
            }
        }
        Completion::Applied
    }

    /// Install metadata for the current metadata query and end its loading
    /// state. Any request still in flight becomes stale.
    pub fn set_metadata(&mut self, metadata: LayerMetadata, outbox: &mut Outbox) -> bool {
        let Some(key) = self.metadata_key.clone() else {
            return false;
        };
        self.metadata_generation += 1;
        self.store_metadata(key, metadata, outbox);
        true
    }

    fn store_metadata(&mut self, key: QueryKey, metadata: LayerMetadata, outbox: &mut Outbox) {
        self.metadata = Some((key, metadata));
        self.context
            .set_loading(self.provider.metadata_settings(), false, outbox);
    }

    /// Forget the metadata so that the next refresh fetches it again.
    pub fn invalidate_metadata(&mut self) {
        self.metadata_key = None;
        self.metadata = None;
    }

    /// Request a data refetch on the next refresh.
    pub fn request_refetch(&mut self) {
        self.refetch_pending = true;
    }

    /// Drop the fetch in flight, returning its keys for cancellation.
    pub fn abandon(&mut self) -> Vec<QueryKey> {
        self.generation += 1;
        self.metadata_generation += 1;
        if self.metadata.is_none() {
            self.metadata_key = None;
        }
        if !self.query_keys.is_empty() {
            self.refetch_pending = true;
        }
        std::mem::take(&mut self.query_keys)
    }
}

impl fmt::Debug for LayerDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerDelegate")
            .field("kind", &self.provider.type_name())
            .field("status", &self.status)
            .field("generation", &self.generation)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

impl SnapshotSource<StatusChanged> for LayerDelegate {
    fn snapshot(&self) -> LayerStatus {
        self.status
    }
}

impl SnapshotSource<DataChanged> for LayerDelegate {
    fn snapshot(&self) -> Option<Rc<LayerData>> {
        self.data.clone()
    }
}
