//! Entry objects: one self-describing `<id>.json` file per record.
//!
//! A rename changes the identifier stored inside the file, so it takes two
//! steps: rename the file, then rewrite its content. If the rewrite fails the
//! file is renamed back; if that also fails the entry stays at the new path
//! with its old content and a warning is logged.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use fsentry_types::{entry_file, Entry, Identifier};

use crate::context::Context;
use crate::error::{StoreError, StoreResult};

/// Manages entry objects under arbitrary parent directories.
#[derive(Clone, Debug)]
pub struct EntryManager {
    ctx: Context,
}

impl EntryManager {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub fn create(&self, parent: &Path, name: &str, data: Value) -> StoreResult<Entry> {
        let id = self.ctx.identifier(name)?;
        self.ctx.require_dir(parent)?;
        let path = entry_file(parent, &id);
        if self.ctx.file_present(&path)? {
            return Err(StoreError::exist(&path));
        }

        let entry = Entry::new(&id, name, data, self.ctx.now());
        self.ctx
            .filesystem()
            .create_file(&path, &self.ctx.encode(&entry)?)?;

        debug!(path = %path.display(), "entry created");
        Ok(entry)
    }

    pub fn get(&self, parent: &Path, name: &str) -> StoreResult<Entry> {
        let id = self.ctx.identifier(name)?;
        let path = self.locate(parent, &id)?;
        self.read(&path)
    }

    /// Rename an entry and refresh its update timestamp.
    pub fn rename(&self, parent: &Path, old_name: &str, new_name: &str) -> StoreResult<Entry> {
        self.relocate(parent, old_name, new_name, true)
    }

    /// Rename an entry keeping both timestamps verbatim.
    pub fn rename_without_timestamp(
        &self,
        parent: &Path,
        old_name: &str,
        new_name: &str,
    ) -> StoreResult<Entry> {
        self.relocate(parent, old_name, new_name, false)
    }

    /// Replace the payload. Identity and creation time are kept.
    pub fn update(&self, parent: &Path, name: &str, data: Value) -> StoreResult<Entry> {
        let id = self.ctx.identifier(name)?;
        let path = self.locate(parent, &id)?;
        let entry = self.read(&path)?.with_data(data, self.ctx.now());
        self.ctx
            .filesystem()
            .update_file(&path, &self.ctx.encode(&entry)?)?;

        debug!(path = %path.display(), "entry updated");
        Ok(entry)
    }

    pub fn remove(&self, parent: &Path, name: &str) -> StoreResult<()> {
        let id = self.ctx.identifier(name)?;
        let path = self.locate(parent, &id)?;
        self.ctx.filesystem().remove_file(&path)?;

        debug!(path = %path.display(), "entry removed");
        Ok(())
    }

    /// Write a copy of an entry under a new name. The copy starts a fresh
    /// lifecycle.
    pub fn duplicate(
        &self,
        src_parent: &Path,
        src_name: &str,
        dst_parent: &Path,
        dst_name: &str,
    ) -> StoreResult<Entry> {
        let src_id = self.ctx.identifier(src_name)?;
        let dst_id = self.ctx.identifier(dst_name)?;
        let src = self.locate(src_parent, &src_id)?;
        self.ctx.require_dir(dst_parent)?;
        let dst = entry_file(dst_parent, &dst_id);
        if self.ctx.file_present(&dst)? {
            return Err(StoreError::exist(&dst));
        }

        let copy = self.read(&src)?.duplicated(&dst_id, dst_name, self.ctx.now());
        self.ctx
            .filesystem()
            .create_file(&dst, &self.ctx.encode(&copy)?)?;

        debug!(from = %src.display(), to = %dst.display(), "entry duplicated");
        Ok(copy)
    }

    fn relocate(
        &self,
        parent: &Path,
        old_name: &str,
        new_name: &str,
        touch: bool,
    ) -> StoreResult<Entry> {
        let old_id = self.ctx.identifier(old_name)?;
        let new_id = self.ctx.identifier(new_name)?;
        let src = self.locate(parent, &old_id)?;
        let dst = entry_file(parent, &new_id);
        if old_id != new_id && self.ctx.file_present(&dst)? {
            return Err(StoreError::exist(&dst));
        }

        let touched = touch.then(|| self.ctx.now());
        let entry = self.read(&src)?.renamed(&new_id, new_name, touched);
        let bytes = self.ctx.encode(&entry)?;
        let fs = self.ctx.filesystem();

        if old_id == new_id {
            fs.update_file(&src, &bytes)?;
            return Ok(entry);
        }

        fs.rename(&src, &dst)?;
        if let Err(err) = fs.update_file(&dst, &bytes) {
            if let Err(undo) = fs.rename(&dst, &src) {
                warn!(
                    path = %dst.display(),
                    error = %undo,
                    "entry rename could not be reverted; content still names the old identifier"
                );
            }
            return Err(err.into());
        }

        debug!(from = %src.display(), to = %dst.display(), "entry moved");
        Ok(entry)
    }

    fn read(&self, path: &Path) -> StoreResult<Entry> {
        let bytes = self.ctx.filesystem().read_file(path)?;
        self.ctx.decode(path, &bytes)
    }

    fn locate(&self, parent: &Path, id: &Identifier) -> StoreResult<PathBuf> {
        self.ctx.require_dir(parent)?;
        let path = entry_file(parent, id);
        if !self.ctx.filesystem().file_exists(&path)? {
            return Err(StoreError::not_exist(&path));
        }
        Ok(path)
    }
}
