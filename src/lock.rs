//! File-based locking for single-writer safety.
//!
//! Cross-platform (fs2) advisory locks taken on the heap file itself:
//! - Exclusive: page writes/appends and the read-modify-write of insert_record.
//! - Shared: reads and scans (many readers, no writer in between).
//!
//! The guard owns the open file handle; all I/O of one call goes through it.
//! fs2 calls go through `FileExt::` explicitly: std::fs::File has inherent lock methods
//! with the same names (and a different try_lock error type).
//! Lock is released on Drop. Locks are advisory: a process that opens the file
//! without HeapFile is not stopped.

use fs2::FileExt;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{HeapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    Shared,
    Exclusive,
}

#[derive(Debug)]
pub struct LockGuard {
    file: File,
    path: PathBuf,
    mode: Option<LockMode>,
}

impl LockGuard {
    /// Wrap a file without locking (HeapConfig::file_lock = false).
    pub fn unlocked(file: File, path: &Path) -> Self {
        Self { file, path: path.to_path_buf(), mode: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> Option<LockMode> {
        self.mode
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn file_mut(&mut self) -> &mut File {
        &mut self.file
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if self.mode.is_some() {
            let _ = FileExt::unlock(&self.file);
        }
    }
}

fn lock_err(path: &Path, source: std::io::Error) -> HeapError {
    HeapError::Lock { path: path.to_path_buf(), source }
}

/// Acquire a lock in the requested mode. Blocks until acquired.
pub fn acquire_lock(file: File, path: &Path, mode: LockMode) -> Result<LockGuard> {
    match mode {
        LockMode::Shared => FileExt::lock_shared(&file).map_err(|e| lock_err(path, e))?,
        LockMode::Exclusive => FileExt::lock_exclusive(&file).map_err(|e| lock_err(path, e))?,
    }
    Ok(LockGuard { file, path: path.to_path_buf(), mode: Some(mode) })
}

/// Try to acquire a lock in the requested mode. Returns Err if already locked.
pub fn try_acquire_lock(file: File, path: &Path, mode: LockMode) -> Result<LockGuard> {
    match mode {
        LockMode::Shared => FileExt::try_lock_shared(&file).map_err(|e| lock_err(path, e))?,
        LockMode::Exclusive => {
            FileExt::try_lock_exclusive(&file).map_err(|e| lock_err(path, e))?
        }
    }
    Ok(LockGuard { file, path: path.to_path_buf(), mode: Some(mode) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;

    fn temp_file(tag: &str) -> PathBuf {
        let t = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("heapdb-lock-{}-{}-{}", tag, std::process::id(), t))
    }

    fn open(path: &Path) -> File {
        OpenOptions::new().read(true).write(true).create(true).open(path).unwrap()
    }

    #[test]
    fn shared_locks_coexist_and_block_exclusive() {
        let path = temp_file("shared");
        let a = acquire_lock(open(&path), &path, LockMode::Shared).unwrap();
        let b = try_acquire_lock(open(&path), &path, LockMode::Shared).unwrap();
        assert_eq!(b.mode(), Some(LockMode::Shared));

        let err = try_acquire_lock(open(&path), &path, LockMode::Exclusive).unwrap_err();
        assert!(matches!(err, HeapError::Lock { .. }), "{:?}", err);

        drop(a);
        drop(b);
        let g = try_acquire_lock(open(&path), &path, LockMode::Exclusive).unwrap();
        assert_eq!(g.mode(), Some(LockMode::Exclusive));
        drop(g);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn drop_releases_exclusive_lock() {
        let path = temp_file("drop");
        let g = acquire_lock(open(&path), &path, LockMode::Exclusive).unwrap();
        assert!(try_acquire_lock(open(&path), &path, LockMode::Exclusive).is_err());
        drop(g);
        assert!(try_acquire_lock(open(&path), &path, LockMode::Shared).is_ok());

        let u = LockGuard::unlocked(open(&path), &path);
        assert_eq!(u.mode(), None);
        assert!(try_acquire_lock(open(&path), &path, LockMode::Exclusive).is_ok());
        std::fs::remove_file(&path).unwrap();
    }
}
