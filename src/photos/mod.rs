//! Photo attachment lifecycle.
//!
//! Uploaded photos live under `<cache_dir>/photos` and are tied to their
//! record: stored at registration, served back via the record's photo
//! endpoint, and removed (best-effort) when the record is deleted.

use anyhow::{Context, Result};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

pub struct PhotoManager {
    photos_dir: PathBuf,
}

impl PhotoManager {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            photos_dir: cache_dir.join("photos"),
        }
    }

    /// Ensure the photos directory exists
    fn ensure_photos_dir(&self) -> Result<()> {
        if !self.photos_dir.exists() {
            fs::create_dir_all(&self.photos_dir)
                .context("Failed to create photos directory")?;
        }
        Ok(())
    }

    /// Generate a unique filename for an upload to avoid conflicts.
    /// Uses a global atomic counter to ensure uniqueness even when called
    /// from multiple tasks within the same second.
    fn generate_photo_name(&self, original: &str) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let original = Path::new(original);
        let timestamp = Utc::now().timestamp();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
        let stem = original
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "photo".to_string());
        let extension = original
            .extension()
            .map(|s| format!(".{}", s.to_string_lossy()))
            .unwrap_or_default();

        let name = format!("{}_{}_{}{}", stem, timestamp, seq, extension);
        self.photos_dir.join(name)
    }

    /// Store an uploaded photo, returning the path it was written to.
    pub fn attach(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.ensure_photos_dir()?;

        let path = self.generate_photo_name(original_name);
        fs::write(&path, bytes).context("Failed to write uploaded photo")?;

        Ok(path)
    }

    /// Externally reachable URL for a record's photo endpoint.
    ///
    /// Derived from the record's final ID; callers must only invoke this
    /// once the ID has been assigned.
    pub fn public_url(host: &str, port: u16, id: u64) -> String {
        format!("http://{}:{}/inventory/{}/photo", host, port, id)
    }

    /// Delete the file at `path` if it exists.
    ///
    /// Deletion is best-effort cleanup, not a correctness requirement:
    /// a missing file or a permission failure is logged and swallowed.
    pub fn release(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!("Could not remove photo {:?}: {}", path, e);
            }
        }
    }
}
