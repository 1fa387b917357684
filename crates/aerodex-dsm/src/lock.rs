//! Cross-process cache locking.
//!
//! Concurrent processes querying the same unindexed area must not both
//! download the same tile. An advisory exclusive lock on a file next to the
//! cache directory serializes the disk-scan/fetch path across processes;
//! the guard releases on drop, so every exit path (including errors)
//! unlocks.

use crate::Result;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// An exclusive cross-process lock, held for the guard's lifetime.
#[derive(Debug)]
pub struct CacheLock {
    file: File,
}

impl CacheLock {
    /// Acquire the lock, blocking until it is available.
    ///
    /// The lock file is created if missing.
    pub fn acquire<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for CacheLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_creates_lock_file() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("cache.lock");

        {
            let _guard = CacheLock::acquire(&lock_path).unwrap();
            assert!(lock_path.exists());
        }

        // Released on drop: a second acquire must succeed immediately
        let _guard = CacheLock::acquire(&lock_path).unwrap();
    }
}
