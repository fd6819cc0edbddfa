//! Configuration file support for shapeboard.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/shapeboard/config.toml`. Settings include the initial drawing
//! tool, scene file persistence and PNG export defaults.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::{ColorSpec, StorageCompression};
pub use types::{DrawingConfig, ExportConfig, StorageConfig};

use crate::draw::{BLACK, Color, TRANSPARENT, WHITE};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [drawing]
/// default_shape = "Polygon"
/// stroke_color = "red"
/// fill_color = [255, 255, 0]
/// stroke_thickness = 3
///
/// [storage]
/// backup = true
/// compress = "auto"
///
/// [export]
/// width = 1920
/// height = 1080
/// background = "white"
/// ```
#[derive(Debug, Serialize, Deserialize, Default, Clone, JsonSchema)]
pub struct Config {
    /// Initial tool settings (shape kind, colors, thickness)
    #[serde(default)]
    pub drawing: DrawingConfig,

    /// Scene file persistence options
    #[serde(default)]
    pub storage: StorageConfig,

    /// PNG export defaults
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value (or replaced by the
    /// default) and a warning is logged.
    ///
    /// Validated ranges:
    /// - `stroke_thickness`: 1 - 50
    /// - `export.width`, `export.height`: 16 - 16384
    /// - `max_file_size_mb`, `auto_compress_threshold_kb`: at least 1
    pub fn validate_and_clamp(&mut self) {
        if self.drawing.default_shape.trim().is_empty() {
            warn!("Empty default_shape, falling back to 'Line'");
            self.drawing.default_shape = types::default_shape();
        }

        // Thickness: 1 - 50
        if !(1..=50).contains(&self.drawing.stroke_thickness) {
            warn!(
                "Invalid stroke_thickness {}, clamping to 1-50 range",
                self.drawing.stroke_thickness
            );
            self.drawing.stroke_thickness = self.drawing.stroke_thickness.clamp(1, 50);
        }

        replace_unknown_color(
            "drawing.stroke_color",
            &mut self.drawing.stroke_color,
            types::default_stroke_color,
        );
        replace_unknown_color(
            "drawing.fill_color",
            &mut self.drawing.fill_color,
            types::default_fill_color,
        );
        replace_unknown_color(
            "export.background",
            &mut self.export.background,
            types::default_background,
        );

        if self.storage.max_file_size_mb == 0 {
            warn!("Invalid max_file_size_mb 0, using 1");
            self.storage.max_file_size_mb = 1;
        }
        if self.storage.auto_compress_threshold_kb == 0 {
            warn!("Invalid auto_compress_threshold_kb 0, using 1");
            self.storage.auto_compress_threshold_kb = 1;
        }

        // Export size: 16 - 16384
        for (name, value) in [
            ("width", &mut self.export.width),
            ("height", &mut self.export.height),
        ] {
            if !(16..=16384).contains(value) {
                warn!("Invalid export {} {}, clamping to 16-16384 range", name, value);
                *value = (*value).clamp(16, 16384);
            }
        }
    }

    pub fn stroke_color(&self) -> Color {
        self.drawing.stroke_color.to_color().unwrap_or(BLACK)
    }

    pub fn fill_color(&self) -> Color {
        self.drawing.fill_color.to_color().unwrap_or(TRANSPARENT)
    }

    pub fn background(&self) -> Color {
        self.export.background.to_color().unwrap_or(WHITE)
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/shapeboard/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("shapeboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, which must exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema describing the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

fn replace_unknown_color(field: &str, spec: &mut ColorSpec, default: fn() -> ColorSpec) {
    if spec.to_color().is_none() {
        warn!("Invalid {} {:?}, falling back to default", field, spec);
        *spec = default();
    }
}
