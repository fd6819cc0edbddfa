//! Committed scene with whole-scene undo/redo.

use crate::codec;
use crate::draw::{Rect, Renderer};
use crate::error::LoadError;
use crate::registry::ShapeRegistry;
use crate::shapes::Shape;
use log::debug;
use std::sync::Arc;

/// Committed shapes; immutable once stored, so snapshots share them.
pub type SharedShape = Arc<dyn Shape>;

type Snapshot = Vec<SharedShape>;

/// The live scene plus linear undo/redo stacks.
///
/// Every edit pushes a copy of the pre-edit shape list (not of the shapes
/// themselves) onto the undo stack, so each step costs O(scene size).
/// Committing new work drops the redo branch.
#[derive(Debug, Default, Clone)]
pub struct DrawingHistory {
    /// Shapes in draw order (first = bottom layer, last = top layer)
    current: Vec<SharedShape>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl DrawingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits a finished shape on top of the scene.
    pub fn add_shape(&mut self, shape: Box<dyn Shape>) {
        self.undo_stack.push(self.current.clone());
        self.current.push(Arc::from(shape));
        self.redo_stack.clear();
    }

    /// Restores the scene before the last edit. Returns `false` if there is
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            return false;
        };
        let replaced = std::mem::replace(&mut self.current, previous);
        self.redo_stack.push(replaced);
        true
    }

    /// Re-applies the last undone edit. Returns `false` if there is nothing to
    /// redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            return false;
        };
        let replaced = std::mem::replace(&mut self.current, next);
        self.undo_stack.push(replaced);
        true
    }

    /// Empties the scene as an undoable edit.
    pub fn clear(&mut self) -> bool {
        if self.current.is_empty() {
            return false;
        }
        self.undo_stack.push(std::mem::take(&mut self.current));
        self.redo_stack.clear();
        true
    }

    /// Draws every shape bottom to top.
    pub fn render_all(&self, renderer: &mut dyn Renderer) {
        for shape in &self.current {
            shape.draw(renderer);
        }
    }

    /// One record per shape, each terminated by a newline.
    pub fn serialize(&self) -> String {
        let mut text = String::new();
        for shape in &self.current {
            text.push_str(&codec::encode(shape.as_ref()));
            text.push('\n');
        }
        text
    }

    /// Replaces the scene with the records in `text` and starts a fresh history.
    ///
    /// Blank lines are skipped. Every record is decoded before anything is
    /// replaced, so on error the scene and both stacks are left untouched.
    pub fn load_from_text(
        &mut self,
        registry: &ShapeRegistry,
        text: &str,
    ) -> Result<usize, LoadError> {
        let mut shapes = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let shape = codec::decode(registry, line).map_err(|source| LoadError {
                line: index + 1,
                source,
            })?;
            shapes.push(SharedShape::from(shape));
        }

        debug!(
            "Loaded {} shapes; dropping {} undo and {} redo steps",
            shapes.len(),
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        self.current = shapes;
        self.undo_stack.clear();
        self.redo_stack.clear();
        Ok(self.current.len())
    }

    pub fn shapes(&self) -> &[SharedShape] {
        &self.current
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Union of every shape's bounding box.
    pub fn bounds(&self) -> Option<Rect> {
        self.current
            .iter()
            .filter_map(|shape| shape.bounding_box())
            .reduce(Rect::union)
    }
}
