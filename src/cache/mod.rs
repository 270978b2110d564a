//! Flat file cache of rendered feeds.
//!
//! One file per search term, named by the SHA-256 of the normalized term.
//! Freshness is decided by the file's modification time; stale files are
//! never deleted, only overwritten by the next miss.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::NamedTempFile;
use tokio::fs;
use tracing::debug;

use crate::app::{EksiError, Result};
use crate::config::DEFAULT_TTL_SECS;
use crate::domain::SearchTerm;

pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_ttl(dir, Duration::from_secs(DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn path_for(&self, term: &SearchTerm) -> PathBuf {
        self.dir.join(format!("{}.xml", term.cache_key()))
    }

    /// Return the cached document if it exists and is younger than the TTL.
    pub async fn lookup(&self, term: &SearchTerm) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(term);

        let modified = match fs::metadata(&path).await {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Cache miss for {:?}: no artifact", term.as_str());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !is_fresh(modified, SystemTime::now(), self.ttl) {
            debug!("Cache miss for {:?}: artifact is stale", term.as_str());
            return Ok(None);
        }

        match fs::read(&path).await {
            Ok(bytes) => {
                debug!("Cache hit for {:?}", term.as_str());
                Ok(Some(bytes))
            }
            // Lost a race with an external cleanup; treat as a miss.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read whatever is cached for the term, ignoring freshness.
    pub async fn read_any(&self, term: &SearchTerm) -> Result<Option<(Vec<u8>, bool)>> {
        let path = self.path_for(term);

        let modified = match fs::metadata(&path).await {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let bytes = fs::read(&path).await?;
        Ok(Some((bytes, is_fresh(modified, SystemTime::now(), self.ttl))))
    }

    /// Replace the artifact for the term with `bytes`.
    ///
    /// The document is written to a uniquely named file in the cache
    /// directory and renamed into place, so readers see either the old or
    /// the new file in full and concurrent writers never share a temp file.
    pub async fn store(&self, term: &SearchTerm, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(term);

        fs::create_dir_all(&self.dir)
            .await
            .map_err(cache_write_error(&self.dir))?;

        let dir = self.dir.clone();
        let target = path.clone();
        let contents = bytes.to_vec();
        tokio::task::spawn_blocking(move || write_atomic(&dir, &target, &contents))
            .await
            .map_err(|e| EksiError::Other(format!("cache writer task failed: {}", e)))??;

        debug!("Stored {} bytes at {}", bytes.len(), path.display());
        Ok(())
    }
}

fn write_atomic(dir: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = NamedTempFile::new_in(dir).map_err(cache_write_error(dir))?;
    tmp.write_all(bytes).map_err(cache_write_error(tmp.path()))?;
    tmp.persist(path)
        .map_err(|e| cache_write_error(path)(e.error))?;
    Ok(())
}

fn cache_write_error(path: &Path) -> impl FnOnce(std::io::Error) -> EksiError {
    let path = path.to_path_buf();
    move |source| EksiError::CacheWrite { path, source }
}

/// An artifact is fresh while `now - modified < ttl`.
///
/// A modification time in the future (clock skew) counts as fresh.
pub fn is_fresh(modified: SystemTime, now: SystemTime, ttl: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age < ttl,
        Err(_) => true,
    }
}
