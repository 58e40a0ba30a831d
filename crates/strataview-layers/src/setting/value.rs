//! Setting values and setting types.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Sentinel used by surfaces without a time dimension.
pub const NO_TIME: &str = "NO_TIME";

/// Identifies one ensemble of one case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnsembleIdent {
    pub case_uuid: Uuid,
    pub ensemble_name: String,
}

impl EnsembleIdent {
    pub fn new(case_uuid: Uuid, ensemble_name: impl Into<String>) -> Self {
        Self {
            case_uuid,
            ensemble_name: ensemble_name.into(),
        }
    }
}

impl fmt::Display for EnsembleIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ensemble_name, &self.case_uuid.to_string()[..8])
    }
}

/// A setting value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SettingValue {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Boolean(bool),
    Ensemble(EnsembleIdent),
}

impl SettingValue {
    pub fn text(value: impl Into<String>) -> Self {
        SettingValue::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SettingValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            SettingValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            SettingValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_ensemble(&self) -> Option<&EnsembleIdent> {
        match self {
            SettingValue::Ensemble(ident) => Some(ident),
            _ => None,
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Boolean(value)
    }
}

impl From<EnsembleIdent> for SettingValue {
    fn from(value: EnsembleIdent) -> Self {
        SettingValue::Ensemble(value)
    }
}

impl<T: Into<SettingValue>> From<Option<T>> for SettingValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(SettingValue::Null, Into::into)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Null => write!(f, "None"),
            SettingValue::Text(text) => write!(f, "{}", text),
            SettingValue::Integer(value) => write!(f, "{}", value),
            SettingValue::Boolean(value) => write!(f, "{}", value),
            SettingValue::Ensemble(ident) => write!(f, "{}", ident),
        }
    }
}

/// The kind of parameter a setting controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingType {
    Ensemble,
    Realization,
    StatisticFunction,
    SurfaceAttribute,
    SurfaceName,
    TimeOrInterval,
    GridModel,
    GridAttribute,
    Wellbore,
    ColorScale,
    ShowGridLines,
}

impl SettingType {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            SettingType::Ensemble => "Ensemble",
            SettingType::Realization => "Realization",
            SettingType::StatisticFunction => "Statistic",
            SettingType::SurfaceAttribute => "Surface attribute",
            SettingType::SurfaceName => "Surface name",
            SettingType::TimeOrInterval => "Time",
            SettingType::GridModel => "Grid model",
            SettingType::GridAttribute => "Grid attribute",
            SettingType::Wellbore => "Wellbore",
            SettingType::ColorScale => "Color scale",
            SettingType::ShowGridLines => "Show grid lines",
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Readable label for an ISO-8601 time point or `start/end` interval.
///
/// Unparseable input is returned unchanged.
pub fn time_or_interval_label(iso: &str) -> String {
    if iso == NO_TIME {
        return "Initial / No date".to_string();
    }
    match iso.split_once('/') {
        Some((start, end)) => format!("{} - {}", date_label(start), date_label(end)),
        None => date_label(iso),
    }
}

fn date_label(iso: &str) -> String {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(iso) {
        return date_time.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        return date_time.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    iso.to_string()
}
