//! # Ledger Directory Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on Windows).

use crate::domain::errors::StoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exclusive lock on a ledger directory, released on drop.
///
/// Only one process may hold a file ledger open at a time. The `LOCK` file
/// is never unlinked, so every opener contends on the same inode; a stale
/// pid left in it is overwritten by the next holder.
#[derive(Debug)]
pub struct LedgerLock {
    file: File,
    path: PathBuf,
    pid: u32,
}

impl LedgerLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Acquire the lock without waiting.
    ///
    /// # Errors
    ///
    /// `StoreError::Locked` if another handle holds the lock.
    pub fn acquire(data_dir: &Path) -> Result<Self, StoreError> {
        let lock_path = data_dir.join(Self::LOCK_FILE);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(io_error)?;

        if FileExt::try_lock_exclusive(&file).is_err() {
            let message = match Self::read_existing_pid(&lock_path) {
                Some(pid) => format!("held by process {pid} ({})", lock_path.display()),
                None => lock_path.display().to_string(),
            };
            return Err(StoreError::Locked { message });
        }

        let pid = std::process::id();
        file.set_len(0).map_err(io_error)?;
        writeln!(file, "{pid}").map_err(io_error)?;
        file.sync_all().map_err(io_error)?;

        Ok(Self {
            file,
            path: lock_path,
            pid,
        })
    }

    /// PID written into the lock file.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_existing_pid(path: &Path) -> Option<u32> {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
    }
}

impl Drop for LedgerLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

pub(crate) fn io_error(err: std::io::Error) -> StoreError {
    StoreError::Io {
        message: err.to_string(),
    }
}
