//! Scene file persistence.
//!
//! Writes the record text of a [`DrawingHistory`](crate::history::DrawingHistory)
//! to disk with locking, optional gzip compression and backup rotation, and
//! reads it back atomically.

mod options;
mod scene;

pub use options::{
    CompressionMode, DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES, DEFAULT_MAX_FILE_SIZE_BYTES,
    StorageOptions, backup_path, lock_path,
};
pub use scene::{SceneSummary, inspect_scene, load_scene, save_scene};
