use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use crate::error::{FsError, FsErrorKind, Result};
use crate::traits::{DirEntry, Filesystem};

/// Identifies one [`Filesystem`] method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FsOp {
    CreateFile,
    ReadFile,
    UpdateFile,
    RemoveFile,
    CreateDir,
    CreateDirAll,
    RemoveDirAll,
    Rename,
    CopyDirAll,
    ListDir,
    FileExists,
    DirExists,
}

/// When and how an injected fault fires.
#[derive(Clone, Copy, Debug)]
pub struct Fault {
    /// Number of calls that pass through before the fault starts firing.
    pub skip: usize,
    /// Kind of the reported error.
    pub kind: FsErrorKind,
    /// Perform the real operation before reporting the error. Simulates a
    /// step whose side effects landed although the call failed.
    pub after_effect: bool,
}

impl Fault {
    /// Fail every call without touching the inner filesystem.
    pub fn always(kind: FsErrorKind) -> Self {
        Self {
            skip: 0,
            kind,
            after_effect: false,
        }
    }

    /// Let `skip` calls through, then fail.
    pub fn after(skip: usize, kind: FsErrorKind) -> Self {
        Self {
            skip,
            ..Self::always(kind)
        }
    }

    /// Run the real operation, then report failure anyway.
    pub fn with_effect(self) -> Self {
        Self {
            after_effect: true,
            ..self
        }
    }
}

/// A [`Filesystem`] wrapper that fails selected operations on demand.
///
/// Used to drive compound object operations into their rollback and cleanup
/// paths, which cannot be reached reliably on a healthy disk.
pub struct FaultyFilesystem<F> {
    inner: F,
    faults: Mutex<HashMap<FsOp, Fault>>,
    calls: Mutex<HashMap<FsOp, usize>>,
}

impl<F: Filesystem> FaultyFilesystem<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            faults: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Install (or replace) the fault for `op`. Resets its call counter.
    pub fn inject(&self, op: FsOp, fault: Fault) {
        self.faults.lock().expect("fault table poisoned").insert(op, fault);
        self.calls.lock().expect("fault table poisoned").remove(&op);
    }

    /// Remove the fault for `op`.
    pub fn clear(&self, op: FsOp) {
        self.faults.lock().expect("fault table poisoned").remove(&op);
    }

    /// Remove every fault.
    pub fn clear_all(&self) {
        self.faults.lock().expect("fault table poisoned").clear();
    }

    /// Number of calls to `op` since its fault was last installed.
    pub fn calls(&self, op: FsOp) -> usize {
        self.calls
            .lock()
            .expect("fault table poisoned")
            .get(&op)
            .copied()
            .unwrap_or(0)
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }

    fn trip(&self, op: FsOp) -> Option<Fault> {
        let seen = {
            let mut calls = self.calls.lock().expect("fault table poisoned");
            let counter = calls.entry(op).or_insert(0);
            *counter += 1;
            *counter
        };
        let faults = self.faults.lock().expect("fault table poisoned");
        faults.get(&op).copied().filter(|f| seen > f.skip)
    }

    fn run<T>(&self, op: FsOp, path: &Path, call: impl FnOnce() -> Result<T>) -> Result<T> {
        match self.trip(op) {
            None => call(),
            Some(fault) => {
                if fault.after_effect {
                    call()?;
                }
                Err(FsError::from_kind(fault.kind, path))
            }
        }
    }
}

impl<F: Filesystem> Filesystem for FaultyFilesystem<F> {
    fn create_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.run(FsOp::CreateFile, path, || self.inner.create_file(path, data))
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        self.run(FsOp::ReadFile, path, || self.inner.read_file(path))
    }

    fn update_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        self.run(FsOp::UpdateFile, path, || self.inner.update_file(path, data))
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.run(FsOp::RemoveFile, path, || self.inner.remove_file(path))
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        self.run(FsOp::CreateDir, path, || self.inner.create_dir(path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.run(FsOp::CreateDirAll, path, || self.inner.create_dir_all(path))
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.run(FsOp::RemoveDirAll, path, || self.inner.remove_dir_all(path))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.run(FsOp::Rename, from, || self.inner.rename(from, to))
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> Result<()> {
        self.run(FsOp::CopyDirAll, to, || self.inner.copy_dir_all(from, to))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        self.run(FsOp::ListDir, path, || self.inner.list_dir(path))
    }

    fn file_exists(&self, path: &Path) -> Result<bool> {
        self.run(FsOp::FileExists, path, || self.inner.file_exists(path))
    }

    fn dir_exists(&self, path: &Path) -> Result<bool> {
        self.run(FsOp::DirExists, path, || self.inner.dir_exists(path))
    }
}
