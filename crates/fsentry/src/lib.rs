//! # fsentry
//!
//! A hierarchical object store that keeps its data as plain files under one
//! root directory, meant to be embedded as an application's lightweight
//! database.
//!
//! ```text
//! <root>/
//!   project_a/            folder "Project A"
//!     .info.json          folder metadata and payload
//!     notes.json          entry "Notes"
//!     logo.bin            binary "Logo"
//! ```
//!
//! Display names are normalized into identifiers (`"Project A"` becomes
//! `project_a`); the original name is kept inside the metadata. Nested
//! objects are addressed with a path of identifiers below the root.
//!
//! # Quick start
//!
//! ```no_run
//! use fsentry::FsEntry;
//! use serde_json::json;
//!
//! let store = FsEntry::new("/tmp/fsentry-demo");
//! store.init()?;
//! store.create_folder(&[], "Project A", &json!({"tag": 1}))?;
//! store.create_entry(&["project_a"], "Notes", &json!({"text": "hi"}))?;
//! assert_eq!(store.list(&["project_a"])?.entries, vec!["notes"]);
//! # Ok::<(), fsentry::StoreError>(())
//! ```

pub mod config;
pub mod store;

pub use config::StoreConfig;
pub use store::FsEntry;

pub use fsentry_core::{Context, StoreError, StoreErrorKind, StoreResult};
pub use fsentry_fs::{Filesystem, LocalFilesystem};
pub use fsentry_types::{normalize, Entry, FolderInfo, Identifier, List, Normalizer};
