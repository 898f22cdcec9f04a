use std::path::Path;

use crate::error::Result;

/// Kind of a directory child as reported by [`Filesystem::list_dir`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirEntryKind {
    File,
    Dir,
    Other,
}

/// One immediate child of a listed directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub kind: DirEntryKind,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == DirEntryKind::Dir
    }

    pub fn is_file(&self) -> bool {
        self.kind == DirEntryKind::File
    }
}

/// Single-step filesystem operations.
///
/// Every call is one logical step; composing steps into pseudo-atomic object
/// operations is the job of the object managers. Implementations must:
/// - classify failures into [`FsError`](crate::FsError) kinds, never panic
/// - not retry failed calls
/// - flush written data to stable storage before returning from writes
pub trait Filesystem: Send + Sync {
    /// Create a new file. Fails `Exist` if it is already there, `BadPath` if
    /// the parent directory is missing.
    fn create_file(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Read a whole file. Fails `NotExist` if absent.
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replace the contents of an existing file. Fails `NotExist` if absent.
    fn update_file(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Remove a file. Fails `NotExist` if absent.
    fn remove_file(&self, path: &Path) -> Result<()>;

    /// Create one directory. Fails `Exist` if present, `BadPath` if the parent
    /// is missing.
    fn create_dir(&self, path: &Path) -> Result<()>;

    /// Create a directory and any missing ancestors. Succeeds if it exists.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a directory and everything in it. Succeeds if it is absent.
    fn remove_dir_all(&self, path: &Path) -> Result<()>;

    /// Rename a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Recursively copy a directory to a destination that must not exist.
    fn copy_dir_all(&self, from: &Path, to: &Path) -> Result<()>;

    /// Immediate children of a directory, in no particular order.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;

    /// `true` if a regular file exists at `path`. A directory there is `BadPath`.
    fn file_exists(&self, path: &Path) -> Result<bool>;

    /// `true` if a directory exists at `path`. A file there is `BadPath`.
    fn dir_exists(&self, path: &Path) -> Result<bool>;
}

impl<F: Filesystem + ?Sized> Filesystem for std::sync::Arc<F> {
    fn create_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        (**self).create_file(path, data)
    }
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).read_file(path)
    }
    fn update_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        (**self).update_file(path, data)
    }
    fn remove_file(&self, path: &Path) -> Result<()> {
        (**self).remove_file(path)
    }
    fn create_dir(&self, path: &Path) -> Result<()> {
        (**self).create_dir(path)
    }
    fn create_dir_all(&self, path: &Path) -> Result<()> {
        (**self).create_dir_all(path)
    }
    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        (**self).remove_dir_all(path)
    }
    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        (**self).rename(from, to)
    }
    fn copy_dir_all(&self, from: &Path, to: &Path) -> Result<()> {
        (**self).copy_dir_all(from, to)
    }
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        (**self).list_dir(path)
    }
    fn file_exists(&self, path: &Path) -> Result<bool> {
        (**self).file_exists(path)
    }
    fn dir_exists(&self, path: &Path) -> Result<bool> {
        (**self).dir_exists(path)
    }
}

