//! Runtime shape plugins.
//!
//! A plugin is a `cdylib` that links this crate and exports a
//! [`PluginDeclaration`] through [`declare_plugin!`]. Its registration function
//! receives a [`PluginRegistrar`] and declares one factory per shape kind:
//!
//! ```ignore
//! use shapeboard::plugin::{PluginRegistrar, factory_of};
//!
//! fn register(registrar: &mut dyn PluginRegistrar) {
//!     registrar.register_shape("Trapezoid", factory_of::<Trapezoid>());
//! }
//!
//! shapeboard::declare_plugin!(register);
//! ```
//!
//! Shapes cross the boundary as Rust trait objects, so host and plugin must be
//! built by the same compiler against the same version of this crate. The
//! declaration records both and [`PluginLoader`] refuses any mismatch.

mod loader;

pub use loader::{PluginLoader, PluginReport};
pub use crate::registry::{ShapeFactory, factory_of};

/// Compiler that built this copy of the crate.
pub const RUSTC_VERSION: &str = env!("SHAPEBOARD_RUSTC_VERSION");

/// Version of this crate, which fixes the [`Shape`](crate::shapes::Shape) layout.
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exported symbol name, NUL-terminated for the dynamic loader.
pub const DECLARATION_SYMBOL: &[u8] = b"shapeboard_plugin_declaration\0";

/// Sink for the shape kinds a plugin declares.
pub trait PluginRegistrar {
    fn register_shape(&mut self, name: &str, factory: ShapeFactory);
}

/// What a plugin exports.
#[derive(Clone, Copy, Debug)]
pub struct PluginDeclaration {
    pub rustc_version: &'static str,
    pub core_version: &'static str,
    pub register: fn(&mut dyn PluginRegistrar),
}

impl PluginDeclaration {
    /// Declaration stamped with this build's versions.
    pub const fn new(register: fn(&mut dyn PluginRegistrar)) -> Self {
        Self {
            rustc_version: RUSTC_VERSION,
            core_version: CORE_VERSION,
            register,
        }
    }
}

/// Exports a plugin declaration for the given registration function.
///
/// Use once per plugin crate, at the crate root.
#[macro_export]
macro_rules! declare_plugin {
    ($register:path) => {
        #[doc(hidden)]
        #[unsafe(no_mangle)]
        #[allow(non_upper_case_globals)]
        pub static shapeboard_plugin_declaration: $crate::plugin::PluginDeclaration =
            $crate::plugin::PluginDeclaration::new($register);
    };
}
