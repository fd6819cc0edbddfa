//! Interactive drawing session.
//!
//! [`Canvas`] ties the registry, the history and the current tool together and
//! turns pointer events into shape updates:
//!
//! - single-shot kinds: press, drag (live preview), release commits
//! - incremental kinds: each press adds a point, double-click completes and
//!   commits

use crate::config::Config;
use crate::draw::{BLACK, Color, Point, Renderer, TRANSPARENT};
use crate::error::{PluginError, ShapeError};
use crate::history::DrawingHistory;
use crate::plugin::{PluginLoader, PluginReport};
use crate::registry::ShapeRegistry;
use crate::shapes::{LINE, Shape, ShapeStyle};
use crate::storage::{self, StorageOptions};
use anyhow::Result;
use log::debug;
use std::path::Path;

/// Style and kind applied to every new shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSettings {
    pub shape_kind: String,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub stroke_thickness: u32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            shape_kind: LINE.to_string(),
            stroke_color: BLACK,
            fill_color: TRANSPARENT,
            stroke_thickness: 1,
        }
    }
}

impl ToolSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            shape_kind: config.drawing.default_shape.clone(),
            stroke_color: config.stroke_color(),
            fill_color: config.fill_color(),
            stroke_thickness: config.drawing.stroke_thickness.max(1),
        }
    }

    fn style(&self) -> ShapeStyle {
        ShapeStyle::new(self.stroke_color, self.stroke_thickness, self.fill_color)
    }
}

/// Current pointer interaction.
#[derive(Debug, Default)]
pub enum DrawingState {
    /// Not drawing - waiting for a press
    #[default]
    Idle,
    /// Button held on a single-shot shape
    Dragging {
        shape: Box<dyn Shape>,
        /// Where the button went down
        start: Point,
    },
    /// Collecting points for an incremental shape
    Chaining {
        shape: Box<dyn Shape>,
        /// Last point added; the next press extends from here
        anchor: Point,
    },
}

/// A drawing session: registry, committed scene and in-progress shape.
#[derive(Debug)]
pub struct Canvas {
    registry: ShapeRegistry,
    history: DrawingHistory,
    tool: ToolSettings,
    state: DrawingState,
    storage: StorageOptions,
    plugins: PluginLoader,
    /// Set whenever the visible scene changes; cleared by the host after drawing
    pub needs_redraw: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Canvas with the built-in kinds and default tool settings.
    pub fn new() -> Self {
        Self::with_registry(ShapeRegistry::with_builtins())
    }

    pub fn with_registry(registry: ShapeRegistry) -> Self {
        Self {
            registry,
            history: DrawingHistory::new(),
            tool: ToolSettings::default(),
            state: DrawingState::Idle,
            storage: StorageOptions::default(),
            plugins: PluginLoader::new(),
            needs_redraw: false,
        }
    }

    /// Canvas whose tool and storage settings come from `config`.
    ///
    /// The configured shape kind is not checked here, since it may belong to a
    /// plugin that is loaded afterwards.
    pub fn from_config(config: &Config) -> Self {
        let mut canvas = Self::new();
        canvas.tool = ToolSettings::from_config(config);
        canvas.storage = StorageOptions::from_config(&config.storage);
        canvas
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn history(&self) -> &DrawingHistory {
        &self.history
    }

    pub fn tool(&self) -> &ToolSettings {
        &self.tool
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// The uncommitted shape, if a drag or chain is in progress.
    pub fn in_progress(&self) -> Option<&dyn Shape> {
        match &self.state {
            DrawingState::Idle => None,
            DrawingState::Dragging { shape, .. } | DrawingState::Chaining { shape, .. } => {
                Some(shape.as_ref())
            }
        }
    }

    /// Selects the kind used by the next press.
    pub fn set_shape_kind(&mut self, kind: &str) -> Result<(), ShapeError> {
        if !self.registry.contains(kind) {
            return Err(ShapeError::UnknownShapeKind(kind.to_string()));
        }
        self.tool.shape_kind = kind.to_string();
        Ok(())
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.tool.stroke_color = color;
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.tool.fill_color = color;
    }

    /// Sets the outline width, clamping to at least 1 pixel.
    pub fn set_stroke_thickness(&mut self, thickness: u32) {
        self.tool.stroke_thickness = thickness.max(1);
    }

    pub fn set_storage_options(&mut self, options: StorageOptions) {
        self.storage = options;
    }

    /// Processes a pointer press.
    ///
    /// - Idle: starts a shape of the current kind
    /// - Chaining: appends a segment from the anchor to `point`
    /// - Dragging: ignored
    pub fn press(&mut self, point: Point) -> Result<(), ShapeError> {
        match &mut self.state {
            DrawingState::Idle => {
                let mut shape = self.registry.create(&self.tool.shape_kind)?;
                *shape.style_mut() = self.tool.style();
                self.state = if shape.is_incremental() {
                    DrawingState::Chaining {
                        shape,
                        anchor: point,
                    }
                } else {
                    shape.update(point, point);
                    DrawingState::Dragging {
                        shape,
                        start: point,
                    }
                };
                debug!("Started {} at {}", self.tool.shape_kind, point);
            }
            DrawingState::Chaining { shape, anchor } => {
                shape.update(*anchor, point);
                *anchor = point;
            }
            DrawingState::Dragging { .. } => return Ok(()),
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Processes pointer motion with the button held.
    pub fn drag(&mut self, point: Point) {
        if let DrawingState::Dragging { shape, start } = &mut self.state {
            shape.update(*start, point);
            self.needs_redraw = true;
        }
    }

    /// Processes a pointer release. Commits a dragged shape and returns `true`
    /// if one was committed.
    pub fn release(&mut self, point: Point) -> bool {
        if !matches!(self.state, DrawingState::Dragging { .. }) {
            return false;
        }
        let DrawingState::Dragging { mut shape, start } = std::mem::take(&mut self.state) else {
            return false;
        };
        shape.update(start, point);
        self.commit(shape);
        true
    }

    /// Completes and commits an in-progress chain. Returns `true` if one was
    /// committed.
    pub fn double_click(&mut self) -> bool {
        if !matches!(self.state, DrawingState::Chaining { .. }) {
            return false;
        }
        let DrawingState::Chaining { mut shape, .. } = std::mem::take(&mut self.state) else {
            return false;
        };
        shape.complete();
        self.commit(shape);
        true
    }

    /// Discards the in-progress shape, if any.
    pub fn cancel(&mut self) {
        if !matches!(self.state, DrawingState::Idle) {
            self.state = DrawingState::Idle;
            self.needs_redraw = true;
        }
    }

    fn commit(&mut self, shape: Box<dyn Shape>) {
        debug!("Committed {} shape", shape.kind());
        self.history.add_shape(shape);
        self.needs_redraw = true;
    }

    /// Draws the committed scene, then the in-progress shape on top.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        self.history.render_all(renderer);
        if let Some(shape) = self.in_progress() {
            shape.draw(renderer);
        }
    }

    pub fn undo(&mut self) -> bool {
        self.cancel();
        let changed = self.history.undo();
        self.needs_redraw |= changed;
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.cancel();
        let changed = self.history.redo();
        self.needs_redraw |= changed;
        changed
    }

    /// Loads a plugin library and registers its shape kinds.
    pub fn load_plugin(&mut self, path: &Path) -> Result<PluginReport, PluginError> {
        self.plugins.load(path, &mut self.registry)
    }

    /// Registers the kinds of a statically linked plugin declaration.
    pub fn load_plugin_declaration(
        &mut self,
        source: &Path,
        declaration: &crate::plugin::PluginDeclaration,
    ) -> Result<PluginReport, PluginError> {
        PluginLoader::load_declaration(source, declaration, &mut self.registry)
    }

    /// Writes the committed scene to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        storage::save_scene(path, &self.history, &self.storage)
    }

    /// Replaces the scene with the contents of `path`, discarding any
    /// in-progress shape. Returns the number of shapes loaded.
    pub fn load(&mut self, path: &Path) -> Result<usize> {
        self.cancel();
        let count = storage::load_scene(path, &mut self.history, &self.registry, &self.storage)?;
        self.needs_redraw = true;
        Ok(count)
    }
}
