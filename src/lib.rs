//! Extensible shape scene editing.
//!
//! The crate models a scene of geometric shapes that can be built
//! interactively, undone and redone, saved to a line-oriented text format and
//! loaded back. New shape kinds can be added at runtime from plugin libraries.
//!
//! - [`shapes`]: the [`Shape`](shapes::Shape) capability and the built-in kinds
//! - [`registry`]: kind name to factory mapping
//! - [`codec`]: one record line per shape
//! - [`history`]: committed scene with snapshot undo/redo
//! - [`plugin`]: the plugin declaration and loader
//! - [`canvas`]: pointer-driven drawing session
//! - [`storage`]: scene files on disk
//! - [`config`]: user settings

pub mod canvas;
pub mod codec;
pub mod config;
pub mod draw;
pub mod error;
pub mod history;
pub mod plugin;
pub mod registry;
pub mod shapes;
pub mod storage;

pub use canvas::{Canvas, ToolSettings};
pub use config::Config;
pub use error::{LoadError, PluginError, PluginTypeRejected, ShapeError};
pub use history::DrawingHistory;
pub use registry::ShapeRegistry;
