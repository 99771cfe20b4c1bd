//! Run lock
//!
//! At most one reconciliation run per store. The lock is an exclusive
//! `fs2` lock on `<store>.run.lock`, held until the guard is dropped.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::{LdapSyncError, LdapSyncResult};

#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Lock path used for a store file
    pub fn path_for(store: &Path) -> PathBuf {
        store.with_extension("run.lock")
    }

    /// Take the lock without waiting; fails if another run holds it
    pub fn acquire(store: &Path) -> LdapSyncResult<Self> {
        let path = Self::path_for(store);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(&path)?;
        file.try_lock_exclusive()
            .map_err(|_| LdapSyncError::RunInProgress { path: path.clone() })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
