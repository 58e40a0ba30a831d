//! Wellbore path layer: one drilled wellbore projected onto the intersection.

use strataview_core::FetchError;

use super::{all_set, ensemble_values, unique_text, FixupInputs, LayerProvider};
use crate::data::{LayerData, LayerMetadata, WellborePathData};
use crate::query::QueryKey;
use crate::setting::{SettingType, SettingValue};
use crate::snapshot::SettingsSnapshot;

const SETTINGS: &[SettingType] = &[SettingType::Ensemble, SettingType::Wellbore];

pub const WELLBORE_HEADERS_ENDPOINT: &str = "well/drilled_wellbore_headers";
pub const WELLBORE_PATH_ENDPOINT: &str = "well/wellbore_trajectory_intersection";

#[derive(Debug, Clone, Copy, Default)]
pub struct WellborePathProvider;

impl LayerProvider for WellborePathProvider {
    fn type_name(&self) -> &'static str {
        "wellbore_path"
    }

    fn default_name(&self) -> &'static str {
        "Wellbore layer"
    }

    fn setting_types(&self) -> &'static [SettingType] {
        SETTINGS
    }

    fn are_settings_valid(&self, values: &SettingsSnapshot) -> bool {
        all_set(values, SETTINGS)
    }

    fn metadata_query(&self, values: &SettingsSnapshot) -> Option<QueryKey> {
        let ensemble = values.get(SettingType::Ensemble);
        if ensemble.is_null() {
            return None;
        }
        Some(QueryKey::new(WELLBORE_HEADERS_ENDPOINT, vec![ensemble.clone()]))
    }

    fn metadata_settings(&self) -> &'static [SettingType] {
        &[SettingType::Wellbore]
    }

    fn decode_metadata(&self, value: serde_json::Value) -> Result<LayerMetadata, FetchError> {
        Ok(LayerMetadata::WellboreHeaders(serde_json::from_value(value)?))
    }

    fn available_values(
        &self,
        key: SettingType,
        _fixed: &SettingsSnapshot,
        inputs: &FixupInputs<'_>,
    ) -> Option<Vec<SettingValue>> {
        match key {
            SettingType::Ensemble => Some(ensemble_values(inputs)),
            SettingType::Wellbore => match inputs.metadata {
                Some(LayerMetadata::WellboreHeaders(headers)) => Some(unique_text(
                    headers.iter().map(|h| h.unique_wellbore_identifier.as_str()),
                )),
                _ => None,
            },
            _ => None,
        }
    }

    fn data_query(&self, values: &SettingsSnapshot) -> QueryKey {
        QueryKey::new(
            WELLBORE_PATH_ENDPOINT,
            vec![
                values.get(SettingType::Ensemble).clone(),
                values.get(SettingType::Wellbore).clone(),
            ],
        )
    }

    fn decode_data(&self, value: serde_json::Value) -> Result<LayerData, FetchError> {
        let data: WellborePathData = serde_json::from_value(value)?;
        Ok(LayerData::WellborePath(data))
    }
}
