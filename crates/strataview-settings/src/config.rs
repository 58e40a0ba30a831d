//! Configuration Management
//!
//! Handles loading, saving, and validating application configuration.
//! Supports JSON and TOML formats, selected by file extension.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strataview_core::constants::{
    DEFAULT_HIGHLIGHT_POINT_RADIUS, DEFAULT_INTERSECTION_THRESHOLD_PX,
    DEFAULT_READOUT_MAX_ITEMS, DEFAULT_SHAPE_MARGIN, DEFAULT_VERTEX_PICK_RADIUS_PX,
    QUERY_CACHE_TIME_MS, QUERY_STALE_TIME_MS,
};

use crate::error::{ConfigError, Result};

/// Hit-testing and readout tolerances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Maximum pixel distance between pointer and hit
    pub threshold_px: f64,
    /// Margin around point shapes, in world units
    pub point_margin: f64,
    /// Margin around line shapes, in world units
    pub line_margin: f64,
    /// Hits listed before "... and N more"
    pub readout_max_items: usize,
    /// Radius of point highlight markers, in pixels
    pub highlight_point_radius: f64,
    /// Pixel radius for picking an existing polyline vertex
    pub vertex_pick_radius_px: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            threshold_px: DEFAULT_INTERSECTION_THRESHOLD_PX,
            point_margin: DEFAULT_SHAPE_MARGIN,
            line_margin: DEFAULT_SHAPE_MARGIN,
            readout_max_items: DEFAULT_READOUT_MAX_ITEMS,
            highlight_point_radius: DEFAULT_HIGHLIGHT_POINT_RADIUS,
            vertex_pick_radius_px: DEFAULT_VERTEX_PICK_RADIUS_PX,
        }
    }
}

/// Lifetimes handed to the query client with every fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuerySettings {
    /// How long a result is considered fresh (ms)
    pub stale_time_ms: u64,
    /// How long an unused result is kept (ms)
    pub cache_time_ms: u64,
}

impl QuerySettings {
    /// Stale time as a duration.
    pub fn stale_time(&self) -> Duration {
        Duration::from_millis(self.stale_time_ms)
    }

    /// Cache time as a duration.
    pub fn cache_time(&self) -> Duration {
        Duration::from_millis(self.cache_time_ms)
    }
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            stale_time_ms: QUERY_STALE_TIME_MS,
            cache_time_ms: QUERY_CACHE_TIME_MS,
        }
    }
}

/// Rendering preferences passed through to layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Color scale preselected for continuous properties
    pub default_continuous_color_scale: String,
    /// Color scale preselected for discrete properties
    pub default_discrete_color_scale: String,
    /// Stroke color of user-drawn polylines
    pub polyline_color: String,
    /// Whether grid layers start with cell edges drawn
    pub show_grid_lines: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            default_continuous_color_scale: "Viridis".to_string(),
            default_discrete_color_scale: "Categorical".to_string(),
            polyline_color: "rgb(255, 165, 0)".to_string(),
            show_grid_lines: false,
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Hit-testing tolerances
    pub interaction: InteractionSettings,
    /// Query lifetimes
    pub query: QuerySettings,
    /// Display defaults
    pub ui: UiSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        let config: Self = match Format::of(path)? {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let interaction = &self.interaction;
        if !(interaction.threshold_px > 0.0) {
            return Err(out_of_range("interaction.threshold_px", interaction.threshold_px));
        }
        if interaction.point_margin < 0.0 {
            return Err(out_of_range("interaction.point_margin", interaction.point_margin));
        }
        if interaction.line_margin < 0.0 {
            return Err(out_of_range("interaction.line_margin", interaction.line_margin));
        }
        if interaction.readout_max_items == 0 {
            return Err(out_of_range(
                "interaction.readout_max_items",
                interaction.readout_max_items,
            ));
        }
        if interaction.highlight_point_radius <= 0.0 {
            return Err(out_of_range(
                "interaction.highlight_point_radius",
                interaction.highlight_point_radius,
            ));
        }

        if self.query.cache_time_ms < self.query.stale_time_ms {
            return Err(out_of_range("query.cache_time_ms", self.query.cache_time_ms));
        }

        if self.ui.default_continuous_color_scale.trim().is_empty() {
            return Err(ConfigError::EmptyValue(
                "ui.default_continuous_color_scale".to_string(),
            ));
        }
        if self.ui.default_discrete_color_scale.trim().is_empty() {
            return Err(ConfigError::EmptyValue(
                "ui.default_discrete_color_scale".to_string(),
            ));
        }

        Ok(())
    }
}

enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> std::result::Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}
