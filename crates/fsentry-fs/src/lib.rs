//! Filesystem primitive layer for fsentry.
//!
//! Exposes single-step operations on files and directories behind the
//! [`Filesystem`] trait and classifies every OS failure into a small set of
//! [`FsErrorKind`]s. Nothing in this crate knows about folders, entries or
//! binaries; composing steps is the object managers' job.
//!
//! # Backends
//!
//! - [`LocalFilesystem`]: the host disk via `std::fs`
//! - [`FaultyFilesystem`]: wraps another backend and fails selected calls,
//!   for exercising rollback and cleanup paths

pub mod error;
pub mod faulty;
pub mod local;
pub mod traits;

pub use error::{FsError, FsErrorKind, Result};
pub use faulty::{Fault, FaultyFilesystem, FsOp};
pub use local::LocalFilesystem;
pub use traits::{DirEntry, DirEntryKind, Filesystem};
