//! Realization grid layer: a grid property sampled along the intersection.

use strataview_core::FetchError;
use strataview_settings::Config;

use super::{all_set, ensemble_values, realization_values, unique_text, FixupInputs, LayerProvider};
use crate::data::{GridIntersectionData, GridModelInfo, LayerData, LayerMetadata};
use crate::query::QueryKey;
use crate::setting::{SettingType, SettingValue, NO_TIME};
use crate::snapshot::SettingsSnapshot;

const SETTINGS: &[SettingType] = &[
    SettingType::Ensemble,
    SettingType::Realization,
    SettingType::GridModel,
    SettingType::GridAttribute,
    SettingType::TimeOrInterval,
    SettingType::ColorScale,
    SettingType::ShowGridLines,
];

/// Keys that select the fetched property; the rest are display-only.
const DATA_SETTINGS: &[SettingType] = &[
    SettingType::Ensemble,
    SettingType::Realization,
    SettingType::GridModel,
    SettingType::GridAttribute,
    SettingType::TimeOrInterval,
];

const METADATA_SETTINGS: &[SettingType] = &[
    SettingType::GridModel,
    SettingType::GridAttribute,
    SettingType::TimeOrInterval,
];

pub const GRID_MODELS_ENDPOINT: &str = "grid3d/grid_models_info";
pub const GRID_PARAMETER_ENDPOINT: &str = "grid3d/grid_parameter_intersection";

#[derive(Debug, Clone, Copy, Default)]
pub struct RealizationGridProvider;

fn grid_models<'a>(inputs: &FixupInputs<'a>) -> Option<&'a [GridModelInfo]> {
    match inputs.metadata {
        Some(LayerMetadata::GridModels(models)) => Some(models),
        _ => None,
    }
}

fn selected_model<'a>(
    models: &'a [GridModelInfo],
    fixed: &SettingsSnapshot,
) -> Option<&'a GridModelInfo> {
    let name = fixed.get(SettingType::GridModel).as_text()?;
    models.iter().find(|model| model.grid_name == name)
}

impl LayerProvider for RealizationGridProvider {
    fn type_name(&self) -> &'static str {
        "realization_grid"
    }

    fn default_name(&self) -> &'static str {
        "Realization Grid layer"
    }

    fn setting_types(&self) -> &'static [SettingType] {
        SETTINGS
    }

    fn default_value(&self, key: SettingType, config: &Config) -> SettingValue {
        match key {
            SettingType::ColorScale => config.ui.default_continuous_color_scale.clone().into(),
            SettingType::ShowGridLines => config.ui.show_grid_lines.into(),
            _ => SettingValue::Null,
        }
    }

    fn refetch_required(&self, old: &SettingsSnapshot, new: &SettingsSnapshot) -> bool {
        old.restricted_to(DATA_SETTINGS) != new.restricted_to(DATA_SETTINGS)
    }

    fn are_settings_valid(&self, values: &SettingsSnapshot) -> bool {
        all_set(values, DATA_SETTINGS)
    }

    fn metadata_query(&self, values: &SettingsSnapshot) -> Option<QueryKey> {
        let ensemble = values.get(SettingType::Ensemble);
        let realization = values.get(SettingType::Realization);
        if ensemble.is_null() || realization.is_null() {
            return None;
        }
        Some(QueryKey::new(
            GRID_MODELS_ENDPOINT,
            vec![ensemble.clone(), realization.clone()],
        ))
    }

    fn metadata_settings(&self) -> &'static [SettingType] {
        METADATA_SETTINGS
    }

    fn decode_metadata(&self, value: serde_json::Value) -> Result<LayerMetadata, FetchError> {
        Ok(LayerMetadata::GridModels(serde_json::from_value(value)?))
    }

    fn available_values(
        &self,
        key: SettingType,
        fixed: &SettingsSnapshot,
        inputs: &FixupInputs<'_>,
    ) -> Option<Vec<SettingValue>> {
        match key {
            SettingType::Ensemble => Some(ensemble_values(inputs)),
            SettingType::Realization => Some(realization_values(fixed, inputs)),
            SettingType::GridModel => {
                let models = grid_models(inputs)?;
                Some(unique_text(models.iter().map(|m| m.grid_name.as_str())))
            }
            SettingType::GridAttribute => {
                let models = grid_models(inputs)?;
                let Some(model) = selected_model(models, fixed) else {
                    return Some(Vec::new());
                };
                Some(unique_text(
                    model
                        .property_info_arr
                        .iter()
                        .map(|info| info.property_name.as_str()),
                ))
            }
            SettingType::TimeOrInterval => {
                let models = grid_models(inputs)?;
                let attribute = fixed.get(SettingType::GridAttribute).as_text();
                let (Some(model), Some(attribute)) = (selected_model(models, fixed), attribute)
                else {
                    return Some(Vec::new());
                };
                Some(unique_text(
                    model
                        .property_info_arr
                        .iter()
                        .filter(|info| info.property_name == attribute)
                        .map(|info| info.iso_date_or_interval.as_deref().unwrap_or(NO_TIME)),
                ))
            }
            _ => None,
        }
    }

    fn data_query(&self, values: &SettingsSnapshot) -> QueryKey {
        let time = match values.get(SettingType::TimeOrInterval) {
            SettingValue::Text(text) if text == NO_TIME => SettingValue::Null,
            other => other.clone(),
        };
        QueryKey::new(
            GRID_PARAMETER_ENDPOINT,
            vec![
                values.get(SettingType::Ensemble).clone(),
                values.get(SettingType::Realization).clone(),
                values.get(SettingType::GridModel).clone(),
                values.get(SettingType::GridAttribute).clone(),
                time,
            ],
        )
    }

    fn decode_data(&self, value: serde_json::Value) -> Result<LayerData, FetchError> {
        let data: GridIntersectionData = serde_json::from_value(value)?;
        Ok(LayerData::Grid(data))
    }
}
