//! In-memory cache for the logo and font files.
//!
//! Entries are keyed by path and revalidated on every lookup against the
//! file's modification time and length, so edits on disk are picked up
//! without a restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;

use image::DynamicImage;
use image_engine::{EngineError, decode_logo};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Decode(#[from] EngineError),
}

struct CachedFile<T> {
    modified: Option<SystemTime>,
    len: u64,
    value: Arc<T>,
}

type CacheMap<T> = RwLock<HashMap<PathBuf, CachedFile<T>>>;

#[derive(Default)]
pub struct AssetCache {
    logos: CacheMap<DynamicImage>,
    fonts: CacheMap<Vec<u8>>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoded logo image at `path`.
    pub fn logo(&self, path: &Path) -> Result<Arc<DynamicImage>, AssetError> {
        load_cached(&self.logos, path, |bytes| Ok(decode_logo(&bytes)?))
    }

    /// Raw font file bytes at `path`; parsing is left to the caller.
    pub fn font_bytes(&self, path: &Path) -> Result<Arc<Vec<u8>>, AssetError> {
        load_cached(&self.fonts, path, Ok)
    }

    /// Number of cached entries across both asset kinds.
    #[cfg(test)]
    pub fn len(&self) -> usize {
        let logos = self.logos.read().unwrap_or_else(PoisonError::into_inner).len();
        let fonts = self.fonts.read().unwrap_or_else(PoisonError::into_inner).len();
        logos + fonts
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load_cached<T, F>(cache: &CacheMap<T>, path: &Path, decode: F) -> Result<Arc<T>, AssetError>
where
    F: FnOnce(Vec<u8>) -> Result<T, AssetError>,
{
    let read_err = |source| AssetError::Read {
        path: path.to_path_buf(),
        source,
    };

    // A vanished file is an error even if an older copy is cached.
    let meta = std::fs::metadata(path).map_err(read_err)?;
    let modified = meta.modified().ok();
    let len = meta.len();

    {
        let entries = cache.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = entries.get(path) {
            if entry.modified.is_some() && entry.modified == modified && entry.len == len {
                return Ok(Arc::clone(&entry.value));
            }
        }
    }

    let bytes = std::fs::read(path).map_err(read_err)?;
    let value = Arc::new(decode(bytes)?);
    tracing::debug!(path = %path.display(), len, "Asset loaded from disk");

    cache.write().unwrap_or_else(PoisonError::into_inner).insert(
        path.to_path_buf(),
        CachedFile {
            modified,
            len,
            value: Arc::clone(&value),
        },
    );
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_logo(path: &Path, width: u32, height: u32) {
        RgbaImage::from_pixel(width, height, Rgba([0, 128, 255, 255]))
            .save(path)
            .unwrap();
    }

    #[test]
    fn logo_is_reused_while_file_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        write_logo(&path, 8, 4);

        let cache = AssetCache::new();
        let first = cache.logo(&path).unwrap();
        let second = cache.logo(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!((first.width(), first.height()), (8, 4));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn logo_is_reloaded_after_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        write_logo(&path, 8, 4);

        let cache = AssetCache::new();
        let first = cache.logo(&path).unwrap();
        write_logo(&path, 40, 20);
        let second = cache.logo(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!((second.width(), second.height()), (40, 20));
    }

    #[test]
    fn missing_file_is_an_error_even_when_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, b"font bytes").unwrap();

        let cache = AssetCache::new();
        assert_eq!(cache.font_bytes(&path).unwrap().as_slice(), b"font bytes");

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            cache.font_bytes(&path),
            Err(AssetError::Read { .. })
        ));
    }

    #[test]
    fn undecodable_logo_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        std::fs::write(&path, b"garbage").unwrap();

        let cache = AssetCache::new();
        assert!(matches!(
            cache.logo(&path),
            Err(AssetError::Decode(EngineError::LogoDecode(_)))
        ));
        assert!(cache.is_empty());
    }
}
