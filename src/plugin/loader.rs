use super::{CORE_VERSION, DECLARATION_SYMBOL, PluginDeclaration, PluginRegistrar, RUSTC_VERSION};
use crate::error::{PluginError, PluginTypeRejected};
use crate::registry::{ShapeFactory, ShapeRegistry};
use libloading::{Library, Symbol};
use log::{debug, info, warn};
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Outcome of one successful plugin load.
#[derive(Debug, Clone, Default)]
pub struct PluginReport {
    pub source: PathBuf,
    /// Kind names now backed by this plugin, in declaration order
    pub registered: Vec<String>,
    pub rejected: Vec<PluginTypeRejected>,
}

/// Collects declared kinds before any of them reach the registry.
#[derive(Default)]
struct Collector {
    entries: Vec<(String, ShapeFactory)>,
}

impl PluginRegistrar for Collector {
    fn register_shape(&mut self, name: &str, factory: ShapeFactory) {
        self.entries.push((name.to_string(), factory));
    }
}

/// Opens plugin libraries and feeds their shape kinds into a registry.
///
/// Loaded libraries stay mapped until the process exits: their code backs
/// every shape their factories produce, including shapes already committed
/// to a history.
#[derive(Debug, Default)]
pub struct PluginLoader {
    loaded: Vec<PathBuf>,
}

impl PluginLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths of every library loaded so far, in load order.
    pub fn loaded(&self) -> &[PathBuf] {
        &self.loaded
    }

    /// Opens the library at `path` and registers its shape kinds.
    ///
    /// Fails only when the library as a whole is unusable. Individual kinds
    /// that fail validation are listed in [`PluginReport::rejected`].
    pub fn load(
        &mut self,
        path: &Path,
        registry: &mut ShapeRegistry,
    ) -> Result<PluginReport, PluginError> {
        info!("Loading shape plugin {}", path.display());

        // SAFETY: running a library's initializers is inherent to loading a
        // plugin; the user chose this path.
        let library = unsafe { Library::new(path) }.map_err(|err| PluginError::LoadFailed {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        let declaration = unsafe {
            let symbol: Symbol<*const PluginDeclaration> =
                library.get(DECLARATION_SYMBOL).map_err(|err| PluginError::LoadFailed {
                    path: path.to_path_buf(),
                    reason: format!("not a shapeboard plugin: {err}"),
                })?;
            let pointer = *symbol;
            if pointer.is_null() {
                return Err(PluginError::LoadFailed {
                    path: path.to_path_buf(),
                    reason: "plugin declaration is null".to_string(),
                });
            }
            // SAFETY: the symbol is the static emitted by `declare_plugin!`.
            *pointer
        };

        check_versions(path, &declaration)?;

        // Kept resident for the process lifetime; see the type docs.
        std::mem::forget(library);

        let report = Self::load_declaration(path, &declaration, registry)?;
        self.loaded.push(path.to_path_buf());
        Ok(report)
    }

    /// Registers the kinds of an already-linked declaration.
    ///
    /// Performs the same version check and per-kind validation as
    /// [`load`](Self::load).
    pub fn load_declaration(
        source: &Path,
        declaration: &PluginDeclaration,
        registry: &mut ShapeRegistry,
    ) -> Result<PluginReport, PluginError> {
        check_versions(source, declaration)?;

        let mut collector = Collector::default();
        let register = declaration.register;
        panic::catch_unwind(AssertUnwindSafe(|| register(&mut collector))).map_err(|_| {
            PluginError::LoadFailed {
                path: source.to_path_buf(),
                reason: "registration function panicked".to_string(),
            }
        })?;

        let mut report = PluginReport {
            source: source.to_path_buf(),
            ..PluginReport::default()
        };

        for (name, factory) in collector.entries {
            match validate(&name, &factory) {
                Ok(()) => {
                    registry.register(name.clone(), factory);
                    report.registered.push(name);
                }
                Err(reason) => {
                    warn!(
                        "Plugin {} declared unusable kind '{}': {}",
                        source.display(),
                        name,
                        reason
                    );
                    report.rejected.push(PluginTypeRejected { name, reason });
                }
            }
        }

        if report.registered.is_empty() && report.rejected.is_empty() {
            warn!("Plugin {} declared no shape kinds", source.display());
        } else {
            info!(
                "Plugin {}: {} kind(s) registered, {} rejected",
                source.display(),
                report.registered.len(),
                report.rejected.len()
            );
        }
        Ok(report)
    }
}

fn check_versions(source: &Path, declaration: &PluginDeclaration) -> Result<(), PluginError> {
    if declaration.rustc_version != RUSTC_VERSION {
        return Err(PluginError::LoadFailed {
            path: source.to_path_buf(),
            reason: format!(
                "built with {}, host built with {}",
                declaration.rustc_version, RUSTC_VERSION
            ),
        });
    }
    if declaration.core_version != CORE_VERSION {
        return Err(PluginError::LoadFailed {
            path: source.to_path_buf(),
            reason: format!(
                "built against shapeboard {}, host is {}",
                declaration.core_version, CORE_VERSION
            ),
        });
    }
    Ok(())
}

fn validate(name: &str, factory: &ShapeFactory) -> Result<(), String> {
    if name.is_empty() {
        return Err("empty kind name".to_string());
    }
    if let Some(bad) = name
        .chars()
        .find(|c| matches!(c, '|' | ',' | ';') || c.is_whitespace())
    {
        return Err(format!("kind name contains reserved character {bad:?}"));
    }

    let probe = panic::catch_unwind(AssertUnwindSafe(|| factory()))
        .map_err(|_| "factory panicked while creating an instance".to_string())?;
    if probe.kind() != name {
        return Err(format!(
            "factory produced a '{}' shape instead",
            probe.kind()
        ));
    }
    debug!("Probed plugin kind '{}'", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::factory_of;
    use crate::shapes::{Line, Rectangle, Shape};
    use std::sync::Arc;

    fn declares_good_and_bad(registrar: &mut dyn PluginRegistrar) {
        registrar.register_shape("Line", factory_of::<Line>());
        registrar.register_shape("Rectangle", factory_of::<Line>());
        registrar.register_shape("Bad Name", factory_of::<Line>());
        registrar.register_shape("", factory_of::<Line>());
        registrar.register_shape(
            "Exploding",
            Arc::new(|| -> Box<dyn Shape> { panic!("no default constructor") }),
        );
    }

    fn declares_nothing(_: &mut dyn PluginRegistrar) {}

    fn panics_on_register(_: &mut dyn PluginRegistrar) {
        panic!("boom");
    }

    fn declares_rectangle(registrar: &mut dyn PluginRegistrar) {
        registrar.register_shape("Rectangle", factory_of::<Rectangle>());
    }

    #[test]
    fn valid_kinds_register_and_invalid_ones_are_reported() {
        let mut registry = ShapeRegistry::new();
        let declaration = PluginDeclaration::new(declares_good_and_bad);
        let report =
            PluginLoader::load_declaration(Path::new("mixed"), &declaration, &mut registry)
                .unwrap();

        assert_eq!(report.registered, vec!["Line".to_string()]);
        let rejected: Vec<&str> = report.rejected.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(rejected, vec!["Rectangle", "Bad Name", "", "Exploding"]);
        assert!(registry.contains("Line"));
        assert!(!registry.contains("Rectangle"));
        assert!(!registry.contains("Exploding"));
    }

    #[test]
    fn loading_twice_is_idempotent() {
        let mut registry = ShapeRegistry::with_builtins();
        let declaration = PluginDeclaration::new(declares_rectangle);
        for _ in 0..2 {
            let report =
                PluginLoader::load_declaration(Path::new("rect"), &declaration, &mut registry)
                    .unwrap();
            assert_eq!(report.registered, vec!["Rectangle".to_string()]);
        }
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.create("Rectangle").unwrap().kind(), "Rectangle");
    }

    #[test]
    fn empty_declaration_is_not_an_error() {
        let mut registry = ShapeRegistry::with_builtins();
        let report = PluginLoader::load_declaration(
            Path::new("empty"),
            &PluginDeclaration::new(declares_nothing),
            &mut registry,
        )
        .unwrap();
        assert!(report.registered.is_empty());
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn version_mismatch_fails_the_load() {
        let mut registry = ShapeRegistry::new();
        let declaration = PluginDeclaration {
            rustc_version: "rustc 0.0.1 (ancient)",
            ..PluginDeclaration::new(declares_rectangle)
        };
        let err = PluginLoader::load_declaration(Path::new("old"), &declaration, &mut registry)
            .unwrap_err();
        assert!(matches!(err, PluginError::LoadFailed { .. }));
        assert!(registry.is_empty());

        let declaration = PluginDeclaration {
            core_version: "0.0.0",
            ..PluginDeclaration::new(declares_rectangle)
        };
        assert!(
            PluginLoader::load_declaration(Path::new("old"), &declaration, &mut registry).is_err()
        );
    }

    #[test]
    fn panicking_registration_fails_the_load() {
        let mut registry = ShapeRegistry::new();
        let err = PluginLoader::load_declaration(
            Path::new("panics"),
            &PluginDeclaration::new(panics_on_register),
            &mut registry,
        )
        .unwrap_err();
        assert!(err.to_string().contains("panicked"));
    }

    #[test]
    fn missing_library_fails_the_load() {
        let mut loader = PluginLoader::new();
        let mut registry = ShapeRegistry::with_builtins();
        let err = loader
            .load(Path::new("/nonexistent/libnothing.so"), &mut registry)
            .unwrap_err();
        assert!(matches!(err, PluginError::LoadFailed { .. }));
        assert!(loader.loaded().is_empty());
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn non_library_file_fails_the_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("libfake.so");
        std::fs::write(&path, b"definitely not an ELF object").unwrap();

        let mut loader = PluginLoader::new();
        let mut registry = ShapeRegistry::with_builtins();
        let err = loader.load(&path, &mut registry).unwrap_err();
        let PluginError::LoadFailed { path: failed, .. } = err;
        assert_eq!(failed, path);
    }
}
