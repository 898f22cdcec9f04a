//! Object managers for fsentry.
//!
//! Each manager owns one object kind and composes single-step
//! [`Filesystem`](fsentry_fs::Filesystem) calls into the operations callers
//! see. Managers take resolved parent directories; nested-path handling and
//! locking live in the `fsentry` crate.
//!
//! | Kind | On disk | Manager |
//! |---|---|---|
//! | folder | `<id>/.info.json` | [`FolderManager`] |
//! | entry | `<id>.json` | [`EntryManager`] |
//! | binary | `<id>.bin` | [`BinaryManager`] |
//!
//! Every operation validates names and checks parent, source and destination
//! before its first destructive step. Compound operations clean up after a
//! failed second step on a best-effort basis and return the original error.

pub mod binary;
pub mod context;
pub mod entry;
pub mod error;
pub mod folder;

pub use binary::BinaryManager;
pub use context::{Clock, Context};
pub use entry::EntryManager;
pub use error::{StoreError, StoreErrorKind, StoreResult};
pub use folder::FolderManager;
