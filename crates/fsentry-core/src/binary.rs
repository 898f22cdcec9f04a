//! Binary objects: raw bytes in `<id>.bin`, no envelope and no timestamps.

use std::path::{Path, PathBuf};

use tracing::debug;

use fsentry_types::{binary_file, Identifier};

use crate::context::Context;
use crate::error::{StoreError, StoreResult};

/// Manages binary objects under arbitrary parent directories.
#[derive(Clone, Debug)]
pub struct BinaryManager {
    ctx: Context,
}

impl BinaryManager {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub fn create(&self, parent: &Path, name: &str, data: &[u8]) -> StoreResult<()> {
        let id = self.ctx.identifier(name)?;
        let path = self.vacant(parent, &id)?;
        self.ctx.filesystem().create_file(&path, data)?;
        debug!(path = %path.display(), len = data.len(), "binary created");
        Ok(())
    }

    pub fn get(&self, parent: &Path, name: &str) -> StoreResult<Vec<u8>> {
        let id = self.ctx.identifier(name)?;
        let path = self.locate(parent, &id)?;
        Ok(self.ctx.filesystem().read_file(&path)?)
    }

    pub fn rename(&self, parent: &Path, old_name: &str, new_name: &str) -> StoreResult<()> {
        let old_id = self.ctx.identifier(old_name)?;
        let new_id = self.ctx.identifier(new_name)?;
        let src = self.locate(parent, &old_id)?;
        if old_id == new_id {
            return Ok(());
        }
        let dst = self.vacant(parent, &new_id)?;
        self.ctx.filesystem().rename(&src, &dst)?;
        debug!(from = %src.display(), to = %dst.display(), "binary moved");
        Ok(())
    }

    pub fn update(&self, parent: &Path, name: &str, data: &[u8]) -> StoreResult<()> {
        let id = self.ctx.identifier(name)?;
        let path = self.locate(parent, &id)?;
        self.ctx.filesystem().update_file(&path, data)?;
        debug!(path = %path.display(), len = data.len(), "binary updated");
        Ok(())
    }

    pub fn remove(&self, parent: &Path, name: &str) -> StoreResult<()> {
        let id = self.ctx.identifier(name)?;
        let path = self.locate(parent, &id)?;
        self.ctx.filesystem().remove_file(&path)?;
        debug!(path = %path.display(), "binary removed");
        Ok(())
    }

    pub fn duplicate(
        &self,
        src_parent: &Path,
        src_name: &str,
        dst_parent: &Path,
        dst_name: &str,
    ) -> StoreResult<()> {
        let src_id = self.ctx.identifier(src_name)?;
        let dst_id = self.ctx.identifier(dst_name)?;
        let src = self.locate(src_parent, &src_id)?;
        let dst = self.vacant(dst_parent, &dst_id)?;
        let data = self.ctx.filesystem().read_file(&src)?;
        self.ctx.filesystem().create_file(&dst, &data)?;
        debug!(from = %src.display(), to = %dst.display(), "binary duplicated");
        Ok(())
    }

    fn locate(&self, parent: &Path, id: &Identifier) -> StoreResult<PathBuf> {
        self.ctx.require_dir(parent)?;
        let path = binary_file(parent, id);
        if !self.ctx.filesystem().file_exists(&path)? {
            return Err(StoreError::not_exist(&path));
        }
        Ok(path)
    }

    fn vacant(&self, parent: &Path, id: &Identifier) -> StoreResult<PathBuf> {
        self.ctx.require_dir(parent)?;
        let path = binary_file(parent, id);
        if self.ctx.file_present(&path)? {
            return Err(StoreError::exist(&path));
        }
        Ok(path)
    }
}
