//! Name-to-factory table for shape kinds.

use crate::error::ShapeError;
use crate::shapes::{self, Ellipse, Line, PointChain, Rectangle, Shape};
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Zero-argument constructor producing an empty shape.
pub type ShapeFactory = Arc<dyn Fn() -> Box<dyn Shape> + Send + Sync>;

/// Wraps `S::default` as a [`ShapeFactory`].
pub fn factory_of<S>() -> ShapeFactory
where
    S: Shape + Default + 'static,
{
    Arc::new(|| Box::new(S::default()) as Box<dyn Shape>)
}

/// Maps kind names to factories.
///
/// Registering an existing name replaces its factory, so a plugin can redefine
/// a built-in kind. Kind names are listed in first-registration order.
///
/// Mutation takes `&mut self`; hosts sharing a registry across threads wrap it
/// in a `Mutex` so registration and creation never overlap.
#[derive(Clone)]
pub struct ShapeRegistry {
    factories: HashMap<String, ShapeFactory>,
    order: Vec<String>,
}

impl ShapeRegistry {
    /// Creates a registry with no kinds at all.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Creates a registry holding the five built-in kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(shapes::LINE, factory_of::<Line>());
        registry.register(shapes::RECTANGLE, factory_of::<Rectangle>());
        registry.register(shapes::ELLIPSE, factory_of::<Ellipse>());
        registry.register(
            shapes::POLYLINE,
            Arc::new(|| Box::new(PointChain::polyline()) as Box<dyn Shape>),
        );
        registry.register(
            shapes::POLYGON,
            Arc::new(|| Box::new(PointChain::polygon()) as Box<dyn Shape>),
        );
        registry
    }

    /// Registers `factory` under `name`, returning the factory it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: ShapeFactory,
    ) -> Option<ShapeFactory> {
        let name = name.into();
        let previous = self.factories.insert(name.clone(), factory);
        if previous.is_some() {
            info!("Shape kind '{}' re-registered; new factory wins", name);
        } else {
            debug!("Registered shape kind '{}'", name);
            self.order.push(name);
        }
        previous
    }

    /// Creates an empty shape of kind `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn Shape>, ShapeError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ShapeError::UnknownShapeKind(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered kind names in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for ShapeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ShapeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeRegistry")
            .field("kinds", &self.order)
            .finish()
    }
}
