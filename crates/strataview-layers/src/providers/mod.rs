//! Layer kinds.
//!
//! A [`LayerProvider`] describes one kind of layer: the settings it has, how
//! their candidate values follow from the session and fetched metadata, when
//! a change needs a refetch, and which queries produce its metadata and data.
//! The three built-in kinds cover grids, surfaces and wellbore paths.

mod grid;
mod surface;
mod wellbore;

pub use grid::RealizationGridProvider;
pub use surface::RealizationSurfaceProvider;
pub use wellbore::WellborePathProvider;

use std::rc::Rc;
use strataview_core::FetchError;
use strataview_settings::Config;

use crate::data::{LayerData, LayerMetadata};
use crate::query::QueryKey;
use crate::session::EnsembleSession;
use crate::setting::{SettingType, SettingValue};
use crate::snapshot::SettingsSnapshot;

/// External inputs of one fixup pass.
pub struct FixupInputs<'a> {
    pub session: &'a dyn EnsembleSession,
    /// Metadata fetched for the current metadata query, if it has arrived.
    pub metadata: Option<&'a LayerMetadata>,
}

/// Behaviour of one layer kind.
pub trait LayerProvider {
    /// Stable identifier of the kind.
    fn type_name(&self) -> &'static str;

    /// Name given to new layers of this kind.
    fn default_name(&self) -> &'static str;

    /// Setting keys, top to bottom of the dependency chain.
    fn setting_types(&self) -> &'static [SettingType];

    /// Initial value of a setting.
    fn default_value(&self, _key: SettingType, _config: &Config) -> SettingValue {
        SettingValue::Null
    }

    fn refetch_required(&self, old: &SettingsSnapshot, new: &SettingsSnapshot) -> bool {
        old != new
    }

    fn are_settings_valid(&self, values: &SettingsSnapshot) -> bool;

    /// Query whose response constrains the available values.
    ///
    /// Called with the values fixed so far in a fixup pass, so it must only
    /// read keys that come before the metadata-dependent keys.
    fn metadata_query(&self, _values: &SettingsSnapshot) -> Option<QueryKey> {
        None
    }

    /// Keys flagged as loading while metadata is in flight.
    fn metadata_settings(&self) -> &'static [SettingType] {
        &[]
    }

    fn decode_metadata(&self, value: serde_json::Value) -> Result<LayerMetadata, FetchError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Candidate values for `key`, given the values fixed above it.
    ///
    /// `None` marks a free value that fixup leaves alone.
    fn available_values(
        &self,
        key: SettingType,
        fixed: &SettingsSnapshot,
        inputs: &FixupInputs<'_>,
    ) -> Option<Vec<SettingValue>>;

    fn data_query(&self, values: &SettingsSnapshot) -> QueryKey;

    fn decode_data(&self, value: serde_json::Value) -> Result<LayerData, FetchError>;
}

/// Built-in layer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    RealizationGrid,
    RealizationSurface,
    WellborePath,
}

impl LayerKind {
    pub fn provider(&self) -> Rc<dyn LayerProvider> {
        match self {
            LayerKind::RealizationGrid => Rc::new(RealizationGridProvider),
            LayerKind::RealizationSurface => Rc::new(RealizationSurfaceProvider),
            LayerKind::WellborePath => Rc::new(WellborePathProvider),
        }
    }
}

/// Ensembles of the session.
pub(crate) fn ensemble_values(inputs: &FixupInputs<'_>) -> Vec<SettingValue> {
    inputs
        .session
        .ensembles()
        .into_iter()
        .map(SettingValue::Ensemble)
        .collect()
}

/// Filtered realizations of the fixed ensemble.
pub(crate) fn realization_values(
    fixed: &SettingsSnapshot,
    inputs: &FixupInputs<'_>,
) -> Vec<SettingValue> {
    match fixed.get(SettingType::Ensemble).as_ensemble() {
        Some(ensemble) => inputs
            .session
            .realizations(ensemble)
            .into_iter()
            .map(SettingValue::Integer)
            .collect(),
        None => Vec::new(),
    }
}

/// Text values in first-seen order without duplicates.
pub(crate) fn unique_text<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<SettingValue> {
    let mut unique: Vec<SettingValue> = Vec::new();
    for value in values {
        let value = SettingValue::text(value);
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

/// True when none of `keys` is `Null`.
pub(crate) fn all_set(values: &SettingsSnapshot, keys: &[SettingType]) -> bool {
    keys.iter().all(|key| !values.get(*key).is_null())
}
