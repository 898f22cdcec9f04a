//! Error taxonomy of the filesystem primitive layer.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The kind of a primitive failure, without context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FsErrorKind {
    NotExist,
    Exist,
    Permission,
    BadPath,
    Internal,
}

/// Errors returned by [`Filesystem`](crate::Filesystem) implementations.
#[derive(Debug, Error)]
pub enum FsError {
    /// The target file or directory does not exist.
    #[error("not exist: {}", .0.display())]
    NotExist(PathBuf),

    /// The target file or directory already exists.
    #[error("already exists: {}", .0.display())]
    Exist(PathBuf),

    /// The OS denied access.
    #[error("permission denied: {}", .0.display())]
    Permission(PathBuf),

    /// A required ancestor directory is missing, or a path component has the
    /// wrong type (file where a directory is expected, or the reverse).
    #[error("bad path: {}", .0.display())]
    BadPath(PathBuf),

    /// Any other OS-level failure.
    #[error("internal error at {}: {reason}", path.display())]
    Internal { path: PathBuf, reason: String },
}

impl FsError {
    pub fn kind(&self) -> FsErrorKind {
        match self {
            Self::NotExist(_) => FsErrorKind::NotExist,
            Self::Exist(_) => FsErrorKind::Exist,
            Self::Permission(_) => FsErrorKind::Permission,
            Self::BadPath(_) => FsErrorKind::BadPath,
            Self::Internal { .. } => FsErrorKind::Internal,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::NotExist(p) | Self::Exist(p) | Self::Permission(p) | Self::BadPath(p) => p,
            Self::Internal { path, .. } => path,
        }
    }

    /// Build an error of the given kind. Used by fault injection.
    pub fn from_kind(kind: FsErrorKind, path: &Path) -> Self {
        let path = path.to_path_buf();
        match kind {
            FsErrorKind::NotExist => Self::NotExist(path),
            FsErrorKind::Exist => Self::Exist(path),
            FsErrorKind::Permission => Self::Permission(path),
            FsErrorKind::BadPath => Self::BadPath(path),
            FsErrorKind::Internal => Self::Internal {
                path,
                reason: "injected failure".into(),
            },
        }
    }

    /// Classify an I/O error. `missing` decides what `NotFound` means for the
    /// calling operation: the target itself, or one of its ancestors.
    pub(crate) fn classify(err: io::Error, path: &Path, missing: FsErrorKind) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound => match missing {
                FsErrorKind::BadPath => Self::BadPath(path),
                _ => Self::NotExist(path),
            },
            io::ErrorKind::AlreadyExists => Self::Exist(path),
            io::ErrorKind::PermissionDenied => Self::Permission(path),
            io::ErrorKind::NotADirectory => Self::BadPath(path),
            io::ErrorKind::IsADirectory => Self::BadPath(path),
            _ => Self::Internal {
                path,
                reason: err.to_string(),
            },
        }
    }
}

/// Convenience alias used throughout the filesystem crate.
pub type Result<T> = std::result::Result<T, FsError>;
