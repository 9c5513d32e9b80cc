//! Scratch directory store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tokio::fs;
use tracing::{debug, info, warn};

use odr_models::RequestId;

use crate::error::{StorageError, StorageResult};
use crate::filename::validate_filename;

/// Local scratch root holding one directory per request.
#[derive(Debug, Clone)]
pub struct ScratchStore {
    root: PathBuf,
}

impl ScratchStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the scratch root if it does not exist yet.
    pub async fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Directory for a request. Does not touch the filesystem.
    pub fn dir(&self, request_id: &RequestId) -> PathBuf {
        self.root.join(request_id.as_str())
    }

    /// Create the directory for a new request.
    pub async fn create(&self, request_id: &RequestId) -> StorageResult<PathBuf> {
        let dir = self.dir(request_id);
        fs::create_dir_all(&dir).await?;
        debug!(request_id = %request_id, dir = %dir.display(), "Created scratch directory");
        Ok(dir)
    }

    /// Path of `filename` inside a request directory, after validation.
    pub fn path(&self, request_id: &RequestId, filename: &str) -> StorageResult<PathBuf> {
        let filename = validate_filename(filename)?;
        Ok(self.dir(request_id).join(filename))
    }

    /// Write `bytes` as `filename` inside an existing request directory.
    pub async fn write(
        &self,
        request_id: &RequestId,
        filename: &str,
        bytes: &[u8],
    ) -> StorageResult<PathBuf> {
        let path = self.path(request_id, filename)?;
        fs::write(&path, bytes).await?;
        Ok(path)
    }

    /// Read a stored file.
    pub async fn read(&self, request_id: &RequestId, filename: &str) -> StorageResult<Vec<u8>> {
        let path = self.path(request_id, filename)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::not_found(filename)),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a request directory and everything in it.
    ///
    /// Returns whether anything was removed; an absent directory is not an
    /// error, so cleanup can be repeated.
    pub async fn cleanup(&self, request_id: &RequestId) -> StorageResult<bool> {
        let dir = self.dir(request_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!(request_id = %request_id, "Removed scratch directory");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Request directories last modified more than `ttl` ago.
    pub async fn expired(&self, ttl: Duration) -> StorageResult<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut expired = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_dir() {
                continue;
            }
            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age > ttl {
                expired.push(entry.path());
            }
        }
        expired.sort();
        Ok(expired)
    }

    /// Remove every request directory older than `ttl`.
    ///
    /// Individual removal failures are logged and skipped. Returns the number
    /// of directories removed.
    pub async fn sweep_expired(&self, ttl: Duration) -> StorageResult<usize> {
        let mut removed = 0;
        for dir in self.expired(ttl).await? {
            match fs::remove_dir_all(&dir).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(dir = %dir.display(), error = %e, "Failed to remove expired scratch directory")
                }
            }
        }
        if removed > 0 {
            info!(removed, "Swept expired scratch directories");
        }
        Ok(removed)
    }

    /// Check that the root exists and accepts writes.
    pub async fn check_writable(&self) -> StorageResult<()> {
        let probe = self.root.join(".ready-probe");
        fs::write(&probe, b"ok").await?;
        fs::remove_file(&probe).await?;
        Ok(())
    }
}
