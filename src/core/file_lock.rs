//! flock(2)-based exclusive locks serializing index and audit writers.

use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// Exclusive lock held until drop (closing the file releases the flock).
#[derive(Debug)]
pub struct FileLock {
    _file: File,
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .with_context(|| format!("open lock file {}", path.display()))
}

impl FileLock {
    /// Block until the lock is ours.
    pub fn exclusive(path: &Path) -> Result<Self> {
        let file = open_lock_file(path)?;
        file.lock_exclusive()
            .with_context(|| format!("acquire lock {}", path.display()))?;
        Ok(Self { _file: file })
    }

    /// `Ok(None)` when another process holds the lock.
    pub fn try_exclusive(path: &Path) -> Result<Option<Self>> {
        let file = open_lock_file(path)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { _file: file })),
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            // fs2 on Linux may report EAGAIN as Other
            Err(ref e) if e.raw_os_error() == Some(11) => Ok(None),
            Err(e) => Err(e).with_context(|| format!("try lock {}", path.display())),
        }
    }

    /// Lock only when `enabled`; otherwise callers accept last-writer-wins.
    pub fn exclusive_if(enabled: bool, path: &Path) -> Result<Option<Self>> {
        if enabled {
            Self::exclusive(path).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_creates_missing_parent() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("home").join("index.lock");
        let lock = FileLock::exclusive(&lock_path).unwrap();
        assert!(lock_path.exists());
        drop(lock);
    }

    #[test]
    fn test_second_writer_is_blocked() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("index.lock");
        let _held = FileLock::exclusive(&lock_path).unwrap();
        assert!(FileLock::try_exclusive(&lock_path).unwrap().is_none());
    }

    #[test]
    fn test_released_on_drop() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("index.lock");
        drop(FileLock::exclusive(&lock_path).unwrap());
        assert!(FileLock::try_exclusive(&lock_path).unwrap().is_some());
    }

    #[test]
    fn test_disabled_lock_is_noop() {
        let dir = TempDir::new().unwrap();
        let lock_path = dir.path().join("index.lock");
        assert!(FileLock::exclusive_if(false, &lock_path).unwrap().is_none());
        assert!(!lock_path.exists());
        assert!(FileLock::exclusive_if(true, &lock_path).unwrap().is_some());
    }
}
