//! Shared fixtures for the layer flow tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::json;
use strataview_core::FetchError;
use strataview_layers::{
    EnsembleIdent, FixupInputs, LayerData, LayerManager, LayerProvider, QueryClient, QueryKey,
    QueryOptions, SettingType, SettingValue, SettingsSnapshot, StaticEnsembleSession,
};
use strataview_settings::Config;
use tokio::sync::oneshot;
use uuid::Uuid;

type Reply = Result<serde_json::Value, FetchError>;

/// Query client whose requests stay pending until the test answers them.
#[derive(Default)]
pub struct ScriptedQueryClient {
    pending: RefCell<Vec<(QueryKey, oneshot::Sender<Reply>)>>,
    requests: RefCell<Vec<QueryKey>>,
    cancelled: RefCell<Vec<QueryKey>>,
}

impl ScriptedQueryClient {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn requests(&self) -> Vec<QueryKey> {
        self.requests.borrow().clone()
    }

    pub fn cancelled(&self) -> Vec<QueryKey> {
        self.cancelled.borrow().clone()
    }

    pub fn pending_keys(&self) -> Vec<QueryKey> {
        self.pending.borrow().iter().map(|(key, _)| key.clone()).collect()
    }

    /// Answer the oldest pending request for `key`.
    pub fn resolve(&self, key: &QueryKey, reply: Reply) -> bool {
        let mut pending = self.pending.borrow_mut();
        let Some(index) = pending.iter().position(|(pending_key, _)| pending_key == key) else {
            return false;
        };
        let (_, sender) = pending.remove(index);
        sender.send(reply).is_ok()
    }

    /// Answer the oldest pending request to `endpoint`.
    pub fn resolve_endpoint(&self, endpoint: &str, reply: Reply) -> bool {
        let key = self
            .pending
            .borrow()
            .iter()
            .find(|(key, _)| key.endpoint == endpoint)
            .map(|(key, _)| key.clone());
        match key {
            Some(key) => self.resolve(&key, reply),
            None => false,
        }
    }
}

#[async_trait(?Send)]
impl QueryClient for ScriptedQueryClient {
    async fn fetch_query(&self, key: QueryKey, _options: QueryOptions) -> Reply {
        self.requests.borrow_mut().push(key.clone());
        let (sender, receiver) = oneshot::channel();
        self.pending.borrow_mut().push((key, sender));
        receiver.await.unwrap_or(Err(FetchError::Cancelled))
    }

    fn cancel_query(&self, key: &QueryKey) {
        self.cancelled.borrow_mut().push(key.clone());
    }
}

/// Let spawned local tasks run to their next await point.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

pub fn ensemble() -> EnsembleIdent {
    EnsembleIdent::new(Uuid::from_u128(0x5eed), "iter-0")
}

pub fn session() -> StaticEnsembleSession {
    StaticEnsembleSession::new().with_ensemble(ensemble(), vec![0, 1, 2, 3])
}

pub fn manager(client: &Rc<ScriptedQueryClient>) -> LayerManager {
    let client: Rc<dyn QueryClient> = client.clone();
    LayerManager::new(client, Rc::new(session()), Config::default())
}

pub fn grid_models_json() -> serde_json::Value {
    json!([
        {
            "grid_name": "Geo1",
            "property_info_arr": [
                { "property_name": "PORO", "iso_date_or_interval": null },
                { "property_name": "PERM", "iso_date_or_interval": null }
            ]
        },
        {
            "grid_name": "Geo2",
            "property_info_arr": [
                { "property_name": "NTG", "iso_date_or_interval": null }
            ]
        }
    ])
}

pub fn grid_data_json() -> serde_json::Value {
    json!({
        "fence_mesh_sections": [],
        "grid_dimensions": [10, 10, 5],
        "min_grid_prop_value": 0.05,
        "max_grid_prop_value": 0.35,
        "min_z": 1500.0,
        "max_z": 1800.0
    })
}

pub fn surface_data_json(name: &str) -> serde_json::Value {
    json!({
        "lines": [
            { "name": name, "z_points": [1600.0, 1610.0], "cum_lengths": [0.0, 100.0] }
        ]
    })
}

pub const CHOICE_ENDPOINT: &str = "test/choice";

/// Layer kind with a single surface-name setting and a fixed choice list.
pub struct ChoiceProvider {
    choices: Vec<SettingValue>,
}

impl ChoiceProvider {
    pub fn new(choices: &[&str]) -> Rc<dyn LayerProvider> {
        Rc::new(Self {
            choices: choices.iter().map(|c| SettingValue::from(*c)).collect(),
        })
    }
}

impl LayerProvider for ChoiceProvider {
    fn type_name(&self) -> &'static str {
        "choice"
    }

    fn default_name(&self) -> &'static str {
        "Choice layer"
    }

    fn setting_types(&self) -> &'static [SettingType] {
        &[SettingType::SurfaceName]
    }

    fn are_settings_valid(&self, values: &SettingsSnapshot) -> bool {
        !values.get(SettingType::SurfaceName).is_null()
    }

    fn available_values(
        &self,
        key: SettingType,
        _fixed: &SettingsSnapshot,
        _inputs: &FixupInputs<'_>,
    ) -> Option<Vec<SettingValue>> {
        (key == SettingType::SurfaceName).then(|| self.choices.clone())
    }

    fn data_query(&self, values: &SettingsSnapshot) -> QueryKey {
        QueryKey::new(
            CHOICE_ENDPOINT,
            vec![values.get(SettingType::SurfaceName).clone()],
        )
    }

    fn decode_data(&self, value: serde_json::Value) -> Result<LayerData, FetchError> {
        Ok(LayerData::Surface(serde_json::from_value(value)?))
    }
}

pub fn text(values: &[&str]) -> Vec<SettingValue> {
    values.iter().map(|v| SettingValue::from(*v)).collect()
}

/// Drive `future` inside a `LocalSet`, which layer fetches require.
pub async fn local<F: std::future::Future>(future: F) -> F::Output {
    tokio::task::LocalSet::new().run_until(future).await
}
