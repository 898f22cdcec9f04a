use std::path::Path;

use fsentry_fs::{FsError, FsErrorKind};
use fsentry_types::TypesError;

/// The kind of a store failure, without context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    BadName,
    BadPath,
    Exist,
    NotExist,
    Corrupted,
    Permission,
    Internal,
}

/// Errors from object manager operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The display name normalizes to an empty or reserved identifier.
    #[error("bad name: {0:?}")]
    BadName(String),

    /// A required ancestor directory does not exist, or a nested-path
    /// segment cannot address a directory under the root.
    #[error("bad path: {0}")]
    BadPath(String),

    /// The destination is already occupied.
    #[error("already exists: {0}")]
    Exist(String),

    /// The source or target object is absent.
    #[error("not exist: {0}")]
    NotExist(String),

    /// A folder directory without a valid info file, or an entry file that
    /// cannot be parsed.
    #[error("corrupted: {0}")]
    Corrupted(String),

    /// The OS denied access.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Any other failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::BadName(_) => StoreErrorKind::BadName,
            Self::BadPath(_) => StoreErrorKind::BadPath,
            Self::Exist(_) => StoreErrorKind::Exist,
            Self::NotExist(_) => StoreErrorKind::NotExist,
            Self::Corrupted(_) => StoreErrorKind::Corrupted,
            Self::Permission(_) => StoreErrorKind::Permission,
            Self::Internal(_) => StoreErrorKind::Internal,
        }
    }

    pub(crate) fn bad_path(path: &Path) -> Self {
        Self::BadPath(path.display().to_string())
    }

    pub(crate) fn exist(path: &Path) -> Self {
        Self::Exist(path.display().to_string())
    }

    pub(crate) fn not_exist(path: &Path) -> Self {
        Self::NotExist(path.display().to_string())
    }

    pub(crate) fn corrupted(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::Corrupted(format!("{}: {reason}", path.display()))
    }
}

impl From<FsError> for StoreError {
    fn from(err: FsError) -> Self {
        let path = err.path().display().to_string();
        match err.kind() {
            FsErrorKind::NotExist => Self::NotExist(path),
            FsErrorKind::Exist => Self::Exist(path),
            FsErrorKind::Permission => Self::Permission(path),
            FsErrorKind::BadPath => Self::BadPath(path),
            FsErrorKind::Internal => Self::Internal(err.to_string()),
        }
    }
}

impl From<TypesError> for StoreError {
    fn from(err: TypesError) -> Self {
        match err {
            TypesError::BadName { name } => Self::BadName(name),
            TypesError::BadSegment { .. } => Self::BadPath(err.to_string()),
            TypesError::Payload(e) => Self::Internal(format!("payload: {e}")),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("json: {err}"))
    }
}

/// Result alias for object manager operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn fs_errors_map_kind_for_kind() {
        let cases = [
            (FsErrorKind::NotExist, StoreErrorKind::NotExist),
            (FsErrorKind::Exist, StoreErrorKind::Exist),
            (FsErrorKind::Permission, StoreErrorKind::Permission),
            (FsErrorKind::BadPath, StoreErrorKind::BadPath),
            (FsErrorKind::Internal, StoreErrorKind::Internal),
        ];
        for (fs_kind, expected) in cases {
            let err: StoreError = FsError::from_kind(fs_kind, Path::new("a/b")).into();
            assert_eq!(err.kind(), expected);
        }
    }

    #[test]
    fn fs_error_keeps_path() {
        let err: StoreError = FsError::NotExist(PathBuf::from("root/notes.json")).into();
        assert!(err.to_string().contains("root/notes.json"));
    }

    #[test]
    fn types_errors_map() {
        let err: StoreError = TypesError::BadName { name: "con".into() }.into();
        assert!(matches!(err, StoreError::BadName(ref n) if n == "con"));

        let err: StoreError = TypesError::BadSegment {
            segment: "..".into(),
            reason: "nope".into(),
        }
        .into();
        assert_eq!(err.kind(), StoreErrorKind::BadPath);
    }
}
