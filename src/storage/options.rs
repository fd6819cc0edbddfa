use crate::config::{StorageCompression, StorageConfig};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES: u64 = 100 * 1024; // 100 KiB
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024; // 10 MiB

/// Compression preference for scene files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Always write plain text.
    Off,
    /// Always write gzip-compressed text.
    On,
    /// Write gzip when payload exceeds the configured threshold.
    Auto,
}

/// Runtime options derived from configuration for scene persistence.
#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub backup: bool,
    pub compression: CompressionMode,
    pub auto_compress_threshold_bytes: u64,
    pub max_file_size_bytes: u64,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            backup: true,
            compression: CompressionMode::Off,
            auto_compress_threshold_bytes: DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES,
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
        }
    }
}

impl StorageOptions {
    /// Build runtime storage options from configuration values.
    pub fn from_config(cfg: &StorageConfig) -> Self {
        Self {
            backup: cfg.backup,
            compression: match cfg.compress {
                StorageCompression::Auto => CompressionMode::Auto,
                StorageCompression::On => CompressionMode::On,
                StorageCompression::Off => CompressionMode::Off,
            },
            auto_compress_threshold_bytes: cfg
                .auto_compress_threshold_kb
                .saturating_mul(1024)
                .max(1),
            max_file_size_bytes: cfg.max_file_size_mb.saturating_mul(1024 * 1024).max(1),
        }
    }

    pub(crate) fn should_compress(&self, payload_len: usize) -> bool {
        match self.compression {
            CompressionMode::Off => false,
            CompressionMode::On => true,
            CompressionMode::Auto => payload_len as u64 >= self.auto_compress_threshold_bytes,
        }
    }
}

/// `scene.txt` -> `scene.txt.bak`
pub fn backup_path(scene: &Path) -> PathBuf {
    with_suffix(scene, ".bak")
}

/// `scene.txt` -> `scene.txt.lock`
pub fn lock_path(scene: &Path) -> PathBuf {
    with_suffix(scene, ".lock")
}

/// First free `scene.txt.tmp`, `scene.txt.tmp1`, ... sibling.
pub(crate) fn temp_path(scene: &Path) -> PathBuf {
    let mut candidate = with_suffix(scene, ".tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = with_suffix(scene, &format!(".tmp{counter}"));
    }
    candidate
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
