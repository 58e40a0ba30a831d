//! Realization surface layer: surfaces sampled along the intersection.

use strataview_core::FetchError;

use super::{all_set, ensemble_values, realization_values, unique_text, FixupInputs, LayerProvider};
use crate::data::{LayerData, LayerMetadata, SurfaceIntersectionData, SurfaceMetaSet, SurfaceTimeType};
use crate::query::QueryKey;
use crate::setting::{SettingType, SettingValue, NO_TIME};
use crate::snapshot::SettingsSnapshot;

const SETTINGS: &[SettingType] = &[
    SettingType::Ensemble,
    SettingType::Realization,
    SettingType::SurfaceAttribute,
    SettingType::SurfaceName,
    SettingType::TimeOrInterval,
];

const METADATA_SETTINGS: &[SettingType] = &[
    SettingType::SurfaceAttribute,
    SettingType::SurfaceName,
    SettingType::TimeOrInterval,
];

pub const SURFACES_METADATA_ENDPOINT: &str = "surface/realization_surfaces_metadata";
pub const SURFACE_INTERSECTION_ENDPOINT: &str = "surface/surface_intersection";

#[derive(Debug, Clone, Copy, Default)]
pub struct RealizationSurfaceProvider;

fn directory<'a>(inputs: &FixupInputs<'a>) -> Option<&'a SurfaceMetaSet> {
    match inputs.metadata {
        Some(LayerMetadata::Surfaces(set)) => Some(set),
        _ => None,
    }
}

impl LayerProvider for RealizationSurfaceProvider {
    fn type_name(&self) -> &'static str {
        "realization_surface"
    }

    fn default_name(&self) -> &'static str {
        "Realization Surface layer"
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
        Some(QueryKey::new(SURFACES_METADATA_ENDPOINT, vec![ensemble.clone()]))
    }

    fn metadata_settings(&self) -> &'static [SettingType] {
        METADATA_SETTINGS
    }

    fn decode_metadata(&self, value: serde_json::Value) -> Result<LayerMetadata, FetchError> {
        Ok(LayerMetadata::Surfaces(serde_json::from_value(value)?))
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
            SettingType::SurfaceAttribute => {
                let set = directory(inputs)?;
                Some(unique_text(
                    set.surfaces.iter().map(|s| s.attribute_name.as_str()),
                ))
            }
            SettingType::SurfaceName => {
                let set = directory(inputs)?;
                let Some(attribute) = fixed.get(SettingType::SurfaceAttribute).as_text() else {
                    return Some(Vec::new());
                };
                Some(unique_text(
                    set.surfaces
                        .iter()
                        .filter(|s| s.attribute_name == attribute)
                        .map(|s| s.name.as_str()),
                ))
            }
            SettingType::TimeOrInterval => {
                let set = directory(inputs)?;
                let attribute = fixed.get(SettingType::SurfaceAttribute).as_text();
                let name = fixed.get(SettingType::SurfaceName).as_text();
                let (Some(attribute), Some(name)) = (attribute, name) else {
                    return Some(Vec::new());
                };
                let time_types: Vec<SurfaceTimeType> = set
                    .surfaces
                    .iter()
                    .filter(|s| s.attribute_name == attribute && s.name == name)
                    .map(|s| s.time_type)
                    .collect();

                let mut values = Vec::new();
                if time_types.contains(&SurfaceTimeType::NoTime) {
                    values.push(SettingValue::text(NO_TIME));
                }
                if time_types.contains(&SurfaceTimeType::TimePoint) {
                    values.extend(set.time_points_iso_str.iter().cloned().map(SettingValue::Text));
                }
                if time_types.contains(&SurfaceTimeType::Interval) {
                    values.extend(
                        set.time_intervals_iso_str
                            .iter()
                            .cloned()
                            .map(SettingValue::Text),
                    );
                }
                Some(values)
            }
            _ => None,
        }
    }

    fn data_query(&self, values: &SettingsSnapshot) -> QueryKey {
        QueryKey::new(
            SURFACE_INTERSECTION_ENDPOINT,
            SETTINGS.iter().map(|key| values.get(*key).clone()).collect(),
        )
    }

    fn decode_data(&self, value: serde_json::Value) -> Result<LayerData, FetchError> {
        let data: SurfaceIntersectionData = serde_json::from_value(value)?;
        Ok(LayerData::Surface(data))
    }
}
