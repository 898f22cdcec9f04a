//! Object metadata as stored in JSON sidecar files.
//!
//! [`FolderInfo`] is the content of a folder's `.info.json`; [`Entry`] is the
//! full content of an entry file. Both share one on-disk shape:
//!
//! ```json
//! { "id": "notes", "name": "Notes", "createdAt": "...", "updatedAt": null, "data": {} }
//! ```

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::names::Identifier;

/// Metadata of a folder object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderInfo {
    /// Identifier derived from `name`; also the directory name on disk.
    pub id: String,
    /// Display name exactly as the caller supplied it.
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// `None` until the first update or rename.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Opaque caller payload.
    #[serde(default)]
    pub data: Value,
}

/// A leaf record stored as `<id>.json`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Identifier derived from `name`; the file stem on disk.
    pub id: String,
    /// Display name exactly as the caller supplied it.
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// `None` until the first update or rename.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Opaque caller payload.
    #[serde(default)]
    pub data: Value,
}

macro_rules! impl_lifecycle {
    ($ty:ty) => {
        impl $ty {
            /// A freshly created object.
            pub fn new(id: &Identifier, name: &str, data: Value, now: DateTime<Utc>) -> Self {
                Self {
                    id: id.to_string(),
                    name: name.to_string(),
                    created_at: now,
                    updated_at: None,
                    data,
                }
            }

            /// Deserialize the payload into a concrete type.
            pub fn data_as<T: DeserializeOwned>(&self) -> Result<T> {
                Ok(T::deserialize(&self.data)?)
            }

            /// Replace the payload and mark the object updated.
            pub fn with_data(self, data: Value, now: DateTime<Utc>) -> Self {
                Self {
                    data,
                    updated_at: Some(now),
                    ..self
                }
            }

            /// Rename. `touched` refreshes the update timestamp; `None` keeps
            /// both timestamps verbatim.
            pub fn renamed(self, id: &Identifier, name: &str, touched: Option<DateTime<Utc>>) -> Self {
                Self {
                    id: id.to_string(),
                    name: name.to_string(),
                    updated_at: touched.or(self.updated_at),
                    ..self
                }
            }

            /// A copy under a new name whose history restarts at `now`.
            pub fn duplicated(&self, id: &Identifier, name: &str, now: DateTime<Utc>) -> Self {
                Self::new(id, name, self.data.clone(), now)
            }
        }
    };
}

impl_lifecycle!(FolderInfo);
impl_lifecycle!(Entry);

/// Snapshot of one directory's immediate children.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    /// Sub-folders with a readable info file.
    pub folders: Vec<String>,
    /// Entry identifiers (file stems of `*.json`).
    pub entries: Vec<String>,
    /// Sub-directories without a valid info file.
    pub corrupted_folders: Vec<String>,
}

impl List {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.entries.is_empty() && self.corrupted_folders.is_empty()
    }
}
