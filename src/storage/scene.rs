use super::options::{StorageOptions, backup_path, lock_path, temp_path};
use crate::draw::Rect;
use crate::history::DrawingHistory;
use crate::registry::ShapeRegistry;
use anyhow::{Context, Result, bail};
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Summary information about a scene file for CLI reporting.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSummary {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub compressed: bool,
    pub shape_count: usize,
    /// Number of shapes per kind
    pub kinds: BTreeMap<String, usize>,
    /// Area covered by all shapes, stroke included
    pub bounds: Option<Rect>,
}

/// Writes the current scene of `history` to `path`.
///
/// The file is replaced atomically; with `backup` enabled the previous
/// version is kept as `<path>.bak`.
pub fn save_scene(path: &Path, history: &DrawingHistory, options: &StorageOptions) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create scene directory {}", parent.display()))?;
    }

    with_lock(path, true, || save_scene_inner(path, history, options))
}

fn save_scene_inner(path: &Path, history: &DrawingHistory, options: &StorageOptions) -> Result<()> {
    let mut payload = history.serialize().into_bytes();

    if payload.len() as u64 > options.max_file_size_bytes {
        bail!(
            "scene data size {} bytes exceeds the configured limit of {} bytes",
            payload.len(),
            options.max_file_size_bytes
        );
    }

    let should_compress = options.should_compress(payload.len());
    if should_compress {
        payload = compress_bytes(&payload)?;
    }

    let tmp_path = temp_path(path);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| {
                format!("failed to open temporary scene file {}", tmp_path.display())
            })?;
        tmp_file
            .write_all(&payload)
            .context("failed to write scene payload")?;
        tmp_file
            .sync_all()
            .context("failed to sync temporary scene file")?;
    }

    if path.exists() {
        if options.backup {
            let backup = backup_path(path);
            if backup.exists() {
                fs::remove_file(&backup).ok();
            }
            fs::rename(path, &backup).with_context(|| {
                format!(
                    "failed to rotate previous scene file {} -> {}",
                    path.display(),
                    backup.display()
                )
            })?;
        } else {
            fs::remove_file(path).ok();
        }
    }

    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "failed to move temporary scene file {} -> {}",
            tmp_path.display(),
            path.display()
        )
    })?;

    info!(
        "Scene saved to {} ({} shapes, {} bytes, compression={})",
        path.display(),
        history.len(),
        payload.len(),
        should_compress
    );

    Ok(())
}

/// Replaces the scene in `history` with the contents of `path`.
///
/// Returns the number of shapes loaded. On any failure the scene and its
/// undo/redo stacks are left untouched.
pub fn load_scene(
    path: &Path,
    history: &mut DrawingHistory,
    registry: &ShapeRegistry,
    options: &StorageOptions,
) -> Result<usize> {
    let (text, compressed) = read_scene(path, options)?;
    let count = history
        .load_from_text(registry, &text)
        .with_context(|| format!("failed to decode scene file {}", path.display()))?;

    info!(
        "Loaded {} shapes from {} (compressed={})",
        count,
        path.display(),
        compressed
    );
    Ok(count)
}

/// Decodes `path` without touching any live scene.
pub fn inspect_scene(
    path: &Path,
    registry: &ShapeRegistry,
    options: &StorageOptions,
) -> Result<SceneSummary> {
    let size_bytes = fs::metadata(path)
        .with_context(|| format!("failed to stat scene file {}", path.display()))?
        .len();
    let (text, compressed) = read_scene(path, options)?;

    let mut scratch = DrawingHistory::new();
    scratch
        .load_from_text(registry, &text)
        .with_context(|| format!("failed to decode scene file {}", path.display()))?;

    let mut kinds = BTreeMap::new();
    for shape in scratch.shapes() {
        *kinds.entry(shape.kind().to_string()).or_insert(0) += 1;
    }

    Ok(SceneSummary {
        path: path.to_path_buf(),
        size_bytes,
        compressed,
        shape_count: scratch.len(),
        kinds,
        bounds: scratch.bounds(),
    })
}

/// Reads and (if needed) decompresses a scene file under a shared lock.
fn read_scene(path: &Path, options: &StorageOptions) -> Result<(String, bool)> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to stat scene file {}", path.display()))?;
    if metadata.len() > options.max_file_size_bytes {
        warn!(
            "Scene file {} is {} bytes which exceeds the configured limit ({} bytes); refusing to load",
            path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
        bail!(
            "scene file {} is {} bytes, above the {} byte limit",
            path.display(),
            metadata.len(),
            options.max_file_size_bytes
        );
    }

    with_lock(path, false, || read_scene_inner(path, options))
}

fn read_scene_inner(path: &Path, options: &StorageOptions) -> Result<(String, bool)> {
    let mut file_bytes = Vec::new();
    {
        let mut file = File::open(path)
            .with_context(|| format!("failed to open scene file {}", path.display()))?;
        file.read_to_end(&mut file_bytes)
            .context("failed to read scene file")?;
    }

    let compressed = is_gzip(&file_bytes);
    let decompressed = if compressed {
        let limit = options.max_file_size_bytes;
        let mut out = Vec::new();
        GzDecoder::new(&file_bytes[..])
            .take(limit.saturating_add(1))
            .read_to_end(&mut out)
            .context("failed to decompress scene file")?;
        if out.len() as u64 > limit {
            warn!(
                "Scene file {} expands past the configured limit ({} bytes); refusing to load",
                path.display(),
                limit
            );
            bail!(
                "scene file {} decompresses to more than the {} byte limit",
                path.display(),
                limit
            );
        }
        out
    } else {
        file_bytes
    };

    let text = String::from_utf8(decompressed)
        .with_context(|| format!("scene file {} is not valid UTF-8", path.display()))?;
    debug!(
        "Read {} bytes of scene text from {}",
        text.len(),
        path.display()
    );
    Ok((text, compressed))
}

/// Runs `f` while holding an advisory lock on `<path>.lock`.
fn with_lock<T>(path: &Path, exclusive: bool, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let lock_path = lock_path(path);
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)
        .with_context(|| format!("failed to open scene lock file {}", lock_path.display()))?;

    if exclusive {
        FileExt::lock_exclusive(&lock_file)
            .with_context(|| format!("failed to lock scene file {}", lock_path.display()))?;
    } else {
        FileExt::lock_shared(&lock_file)
            .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?;
    }

    let result = f();

    FileExt::unlock(&lock_file).unwrap_or_else(|err| {
        warn!(
            "failed to unlock scene file {}: {}",
            lock_path.display(),
            err
        )
    });

    result
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("failed to compress scene payload")?;
    encoder
        .finish()
        .context("failed to finalise compressed scene payload")
}

fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}
