//! Configuration type definitions.

use super::enums::{ColorSpec, StorageCompression};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Drawing-related settings.
///
/// Controls the tool state a new canvas starts with.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct DrawingConfig {
    /// Shape kind selected at startup; may name a plugin kind loaded with `--plugin`
    #[serde(default = "default_shape")]
    pub default_shape: String,

    /// Outline color - a named color, a hex string or an RGB array like `[255, 0, 0]`
    #[serde(default = "default_stroke_color")]
    pub stroke_color: ColorSpec,

    /// Interior color; `"transparent"` leaves shapes unfilled
    #[serde(default = "default_fill_color")]
    pub fill_color: ColorSpec,

    /// Outline width in pixels (valid range: 1 - 50)
    #[serde(default = "default_stroke_thickness")]
    pub stroke_thickness: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            default_shape: default_shape(),
            stroke_color: default_stroke_color(),
            fill_color: default_fill_color(),
            stroke_thickness: default_stroke_thickness(),
        }
    }
}

/// Scene file persistence settings.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct StorageConfig {
    /// Keep the previous version of a scene as `<file>.bak` when saving
    #[serde(default = "default_backup")]
    pub backup: bool,

    /// Compression mode: off, on, or auto
    #[serde(default)]
    pub compress: StorageCompression,

    /// Payload size above which `auto` compresses, in KiB
    #[serde(default = "default_auto_compress_threshold_kb")]
    pub auto_compress_threshold_kb: u64,

    /// Largest scene file that will be read, in MiB
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backup: default_backup(),
            compress: StorageCompression::default(),
            auto_compress_threshold_kb: default_auto_compress_threshold_kb(),
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

/// PNG export settings.
#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
pub struct ExportConfig {
    /// Image width in pixels (valid range: 16 - 16384)
    #[serde(default = "default_export_width")]
    pub width: i32,

    /// Image height in pixels (valid range: 16 - 16384)
    #[serde(default = "default_export_height")]
    pub height: i32,

    /// Background painted before the shapes; `"transparent"` keeps alpha
    #[serde(default = "default_background")]
    pub background: ColorSpec,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: default_export_width(),
            height: default_export_height(),
            background: default_background(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

pub(super) fn default_shape() -> String {
    "Line".to_string()
}

pub(super) fn default_stroke_color() -> ColorSpec {
    ColorSpec::named("black")
}

pub(super) fn default_fill_color() -> ColorSpec {
    ColorSpec::named("transparent")
}

fn default_stroke_thickness() -> u32 {
    2
}

fn default_backup() -> bool {
    true
}

fn default_auto_compress_threshold_kb() -> u64 {
    100
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_export_width() -> i32 {
    1280
}

fn default_export_height() -> i32 {
    720
}

pub(super) fn default_background() -> ColorSpec {
    ColorSpec::named("white")
}
