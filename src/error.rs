//! Error types for shape construction, decoding and plugin loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while creating or decoding a single shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// No factory is registered under this kind name.
    #[error("unknown shape kind '{0}'")]
    UnknownShapeKind(String),

    /// A record for a known kind could not be decoded.
    #[error("malformed {kind} record: {reason}")]
    MalformedRecord { kind: String, reason: String },
}

impl ShapeError {
    pub fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
        ShapeError::MalformedRecord {
            kind: kind.into(),
            reason: reason.into(),
        }
    }
}

/// The first record that stopped a scene load.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct LoadError {
    /// 1-based line number in the source text
    pub line: usize,
    #[source]
    pub source: ShapeError,
}

/// The plugin unit as a whole could not be used.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("failed to load plugin {path}: {reason}")]
    LoadFailed { path: PathBuf, reason: String },
}

/// One declared plugin type was refused; the rest of the scan continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("plugin type '{name}' rejected: {reason}")]
pub struct PluginTypeRejected {
    pub name: String,
    pub reason: String,
}
