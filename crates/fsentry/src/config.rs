use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use fsentry_types::Normalizer;

/// Settings for an [`FsEntry`](crate::FsEntry) instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory that holds the whole object tree.
    pub root: PathBuf,
    /// Tab-indent JSON sidecars instead of writing them compact.
    pub pretty: bool,
    /// Names refused as identifiers in addition to the platform device names.
    pub extra_reserved_names: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            pretty: false,
            extra_reserved_names: Vec::new(),
        }
    }
}

impl StoreConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn reserve<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_reserved_names
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub(crate) fn normalizer(&self) -> Normalizer {
        Normalizer::default().with_reserved(&self.extra_reserved_names)
    }
}
