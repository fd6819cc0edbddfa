//! Drawing primitives shared by every shape kind.
//!
//! This module defines:
//! - [`Color`]: RGBA color with packed ARGB conversion and the transparent sentinel
//! - [`Point`] / [`Rect`]: integer canvas geometry
//! - [`Renderer`]: the drawing-surface capability shapes render through
//! - a Cairo-backed renderer and PNG export (feature `cairo`)

pub mod color;
pub mod geometry;
#[cfg(feature = "cairo")]
pub mod raster;
pub mod render;

pub use color::Color;
pub use geometry::{Point, Rect};
pub use render::{DrawCall, RecordingRenderer, Renderer, Stroke};

#[cfg(feature = "cairo")]
pub use raster::{CairoRenderer, ExportOptions, export_png};

pub use color::{BLACK, BLUE, GRAY, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
