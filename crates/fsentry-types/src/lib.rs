//! Foundation types for fsentry.
//!
//! fsentry stores hierarchical data on the host filesystem: folders are
//! directories carrying a JSON info file, entries are JSON files, and
//! binaries are raw byte files. This crate holds the pieces every other
//! layer depends on and that perform no I/O.
//!
//! # Modules
//!
//! - [`names`]: display name to [`Identifier`] normalization
//! - [`path`]: deterministic on-disk path construction
//! - [`object`]: [`FolderInfo`], [`Entry`] and [`List`] metadata types
//! - [`error`]: validation errors

pub mod error;
pub mod names;
pub mod object;
pub mod path;

pub use error::{Result, TypesError};
pub use names::{normalize, Identifier, Normalizer, MAX_IDENTIFIER_LEN, RESERVED_NAMES};
pub use object::{Entry, FolderInfo, List};
pub use path::{
    binary_file, build_path, entry_file, folder_dir, info_file, resolve, BINARY_SUFFIX,
    ENTRY_SUFFIX, INFO_FILE_NAME,
};
