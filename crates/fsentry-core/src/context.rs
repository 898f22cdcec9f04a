use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::warn;

use fsentry_fs::{Filesystem, FsErrorKind};
use fsentry_types::{Identifier, Normalizer};

use crate::error::{StoreError, StoreResult};

/// Source of "now" for created/updated timestamps.
pub type Clock = fn() -> DateTime<Utc>;

/// Collaborators shared by all object managers.
#[derive(Clone)]
pub struct Context {
    fs: Arc<dyn Filesystem>,
    normalizer: Arc<Normalizer>,
    pretty: bool,
    clock: Clock,
}

impl Context {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self {
            fs,
            normalizer: Arc::new(Normalizer::default()),
            pretty: false,
            clock: Utc::now,
        }
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = Arc::new(normalizer);
        self
    }

    /// Write JSON sidecars tab-indented instead of compact.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn filesystem(&self) -> &dyn Filesystem {
        self.fs.as_ref()
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    pub(crate) fn identifier(&self, name: &str) -> StoreResult<Identifier> {
        Ok(self.normalizer.identifier(name)?)
    }

    /// `BadPath` unless `dir` is an existing directory.
    pub(crate) fn require_dir(&self, dir: &Path) -> StoreResult<()> {
        if self.fs.dir_exists(dir)? {
            Ok(())
        } else {
            Err(StoreError::bad_path(dir))
        }
    }

    /// Existence of a file that is expected to be a regular file. Something
    /// else occupying the name counts as present.
    pub(crate) fn file_present(&self, path: &Path) -> StoreResult<bool> {
        match self.fs.file_exists(path) {
            Ok(found) => Ok(found),
            Err(err) if err.kind() == FsErrorKind::BadPath => Ok(true),
            Err(err) => Err(err.into()),
        }
    }

    /// Existence of a directory. A file occupying the name counts as present.
    pub(crate) fn dir_present(&self, path: &Path) -> StoreResult<bool> {
        match self.fs.dir_exists(path) {
            Ok(found) => Ok(found),
            Err(err) if err.kind() == FsErrorKind::BadPath => Ok(true),
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn encode<T: Serialize>(&self, value: &T) -> StoreResult<Vec<u8>> {
        let mut buf = Vec::new();
        if self.pretty {
            let formatter = PrettyFormatter::with_indent(b"\t");
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            value.serialize(&mut ser)?;
        } else {
            serde_json::to_writer(&mut buf, value)?;
        }
        Ok(buf)
    }

    /// Parse a sidecar read from `path`. Malformed content is `Corrupted`.
    pub(crate) fn decode<T: DeserializeOwned>(&self, path: &Path, bytes: &[u8]) -> StoreResult<T> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::corrupted(path, e))
    }

    /// Remove a partially built directory. Failures are logged and dropped.
    pub(crate) fn discard_dir(&self, dir: &Path, during: &str) {
        if let Err(err) = self.fs.remove_dir_all(dir) {
            warn!(path = %dir.display(), during, error = %err, "cleanup failed");
        }
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("normalizer", &self.normalizer)
            .field("pretty", &self.pretty)
            .finish_non_exhaustive()
    }
}
