//! Identifier normalization.
//!
//! Every object in the store is addressed on disk by an identifier derived
//! from the caller's display name:
//! - lower-cased
//! - spaces replaced with `_`
//! - everything except Unicode letters, ASCII digits and `_` stripped
//! - truncated to [`MAX_IDENTIFIER_LEN`] characters
//! - rejected (empty) when it matches a platform-reserved device name
//!
//! Normalization is a pure function of its input and is idempotent:
//! `normalize(normalize(x)) == normalize(x)`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypesError};

/// Maximum identifier length in characters. Some filesystems refuse longer names.
pub const MAX_IDENTIFIER_LEN: usize = 200;

/// Device names that cannot be used as file names on Windows.
pub const RESERVED_NAMES: &[&str] = &[
    "con", "prn", "aux", "nul", //
    "com0", "com1", "com2", "com3", "com4", "com5", "com6", "com7", "com8", "com9", //
    "lpt0", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// A validated, filesystem-safe identifier. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Maps display names to identifiers against a table of reserved names.
#[derive(Clone, Debug)]
pub struct Normalizer {
    reserved: BTreeSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            reserved: RESERVED_NAMES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Normalizer {
    /// A normalizer with the default reserved-name table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the reserved table. Extra names are normalized before they are
    /// stored, so `"My Device"` reserves the identifier `my_device`.
    pub fn with_reserved<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let id = sanitize(name.as_ref());
            if !id.is_empty() {
                self.reserved.insert(id);
            }
        }
        self
    }

    pub fn is_reserved(&self, id: &str) -> bool {
        self.reserved.contains(id)
    }

    /// Normalize a display name. Returns an empty string when the name has no
    /// usable characters or is reserved.
    pub fn normalize(&self, name: &str) -> String {
        let id = sanitize(name);
        if self.is_reserved(&id) {
            return String::new();
        }
        id
    }

    /// Normalize a display name into an [`Identifier`], failing with
    /// [`TypesError::BadName`] when nothing usable remains.
    pub fn identifier(&self, name: &str) -> Result<Identifier> {
        let id = self.normalize(name);
        if id.is_empty() {
            return Err(TypesError::BadName {
                name: name.to_string(),
            });
        }
        Ok(Identifier(id))
    }
}

/// Normalize with the default reserved table.
///
/// # Examples
///
/// ```
/// use fsentry_types::names::normalize;
///
/// assert_eq!(normalize("Project A"), "project_a");
/// assert_eq!(normalize("Notes (v2)!"), "notes_v2");
/// assert_eq!(normalize("CON"), "");
/// assert_eq!(normalize("%%%"), "");
/// ```
pub fn normalize(name: &str) -> String {
    Normalizer::default().normalize(name)
}

fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|ch| if ch == ' ' { '_' } else { ch })
        .filter(|ch| ch.is_alphabetic() || ch.is_ascii_digit() || *ch == '_')
        .take(MAX_IDENTIFIER_LEN)
        .collect()
}
