use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use fsentry_core::{BinaryManager, Context, EntryManager, FolderManager, StoreResult};
use fsentry_fs::{Filesystem, LocalFilesystem};
use fsentry_types::{resolve, Entry, FolderInfo, List};

use crate::config::StoreConfig;

/// A hierarchical object store rooted at one directory.
///
/// Every call takes a nested `path` of folder identifiers below the root
/// (`&[]` for the root itself). Mutations hold one store-wide lock
/// exclusively; `get_*` and [`list`](Self::list) share it. The lock is
/// in-process only.
pub struct FsEntry {
    root: PathBuf,
    lock: RwLock<()>,
    ctx: Context,
    folders: FolderManager,
    entries: EntryManager,
    binaries: BinaryManager,
}

impl FsEntry {
    /// A store on the local disk with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_config(StoreConfig::new(root))
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self::with_filesystem(config, Arc::new(LocalFilesystem::new()))
    }

    /// A store over an arbitrary filesystem backend.
    pub fn with_filesystem(config: StoreConfig, fs: Arc<dyn Filesystem>) -> Self {
        let ctx = Context::new(fs)
            .with_normalizer(config.normalizer())
            .pretty(config.pretty);
        Self::from_context(config.root, ctx)
    }

    /// A store over prepared manager collaborators.
    pub fn from_context(root: impl Into<PathBuf>, ctx: Context) -> Self {
        Self {
            root: root.into(),
            lock: RwLock::new(()),
            folders: FolderManager::new(ctx.clone()),
            entries: EntryManager::new(ctx.clone()),
            binaries: BinaryManager::new(ctx.clone()),
            ctx,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ---- Root operations ----

    /// Create the root directory and any missing ancestors.
    pub fn init(&self) -> StoreResult<()> {
        let _guard = self.write();
        self.ctx.filesystem().create_dir_all(&self.root)?;
        debug!(root = %self.root.display(), "store initialized");
        Ok(())
    }

    /// Delete the root directory with everything below it. Succeeds when the
    /// root does not exist.
    pub fn drop_root(&self) -> StoreResult<()> {
        let _guard = self.write();
        self.ctx.filesystem().remove_dir_all(&self.root)?;
        debug!(root = %self.root.display(), "store dropped");
        Ok(())
    }

    /// Immediate children of a nested path.
    pub fn list(&self, path: &[&str]) -> StoreResult<List> {
        let _guard = self.read();
        self.folders.list(&self.resolve(path)?)
    }

    // ---- Folders ----

    pub fn create_folder<T: Serialize + ?Sized>(
        &self,
        path: &[&str],
        name: &str,
        data: &T,
    ) -> StoreResult<FolderInfo> {
        let data = to_value(data)?;
        let _guard = self.write();
        self.folders.create(&self.resolve(path)?, name, data)
    }

    pub fn get_folder(&self, path: &[&str], name: &str) -> StoreResult<FolderInfo> {
        let _guard = self.read();
        self.folders.get(&self.resolve(path)?, name)
    }

    pub fn move_folder(&self, path: &[&str], old_name: &str, new_name: &str) -> StoreResult<FolderInfo> {
        let _guard = self.write();
        self.folders.rename(&self.resolve(path)?, old_name, new_name)
    }

    /// Rename a folder without it being observable as a content change.
    pub fn move_folder_without_timestamp(
        &self,
        path: &[&str],
        old_name: &str,
        new_name: &str,
    ) -> StoreResult<FolderInfo> {
        let _guard = self.write();
        self.folders
            .rename_without_timestamp(&self.resolve(path)?, old_name, new_name)
    }

    pub fn update_folder<T: Serialize + ?Sized>(
        &self,
        path: &[&str],
        name: &str,
        data: &T,
    ) -> StoreResult<FolderInfo> {
        let data = to_value(data)?;
        let _guard = self.write();
        self.folders.update(&self.resolve(path)?, name, data)
    }

    pub fn remove_folder(&self, path: &[&str], name: &str) -> StoreResult<()> {
        let _guard = self.write();
        self.folders.remove(&self.resolve(path)?, name)
    }

    pub fn duplicate_folder(&self, path: &[&str], src_name: &str, dst_name: &str) -> StoreResult<FolderInfo> {
        let _guard = self.write();
        let parent = self.resolve(path)?;
        self.folders.duplicate(&parent, src_name, &parent, dst_name)
    }

    // ---- Entries ----

    pub fn create_entry<T: Serialize + ?Sized>(
        &self,
        path: &[&str],
        name: &str,
        data: &T,
    ) -> StoreResult<Entry> {
        let data = to_value(data)?;
        let _guard = self.write();
        self.entries.create(&self.resolve(path)?, name, data)
    }

    pub fn get_entry(&self, path: &[&str], name: &str) -> StoreResult<Entry> {
        let _guard = self.read();
        self.entries.get(&self.resolve(path)?, name)
    }

    pub fn move_entry(&self, path: &[&str], old_name: &str, new_name: &str) -> StoreResult<Entry> {
        let _guard = self.write();
        self.entries.rename(&self.resolve(path)?, old_name, new_name)
    }

    pub fn move_entry_without_timestamp(
        &self,
        path: &[&str],
        old_name: &str,
        new_name: &str,
    ) -> StoreResult<Entry> {
        let _guard = self.write();
        self.entries
            .rename_without_timestamp(&self.resolve(path)?, old_name, new_name)
    }

    pub fn update_entry<T: Serialize + ?Sized>(
        &self,
        path: &[&str],
        name: &str,
        data: &T,
    ) -> StoreResult<Entry> {
        let data = to_value(data)?;
        let _guard = self.write();
        self.entries.update(&self.resolve(path)?, name, data)
    }

    pub fn remove_entry(&self, path: &[&str], name: &str) -> StoreResult<()> {
        let _guard = self.write();
        self.entries.remove(&self.resolve(path)?, name)
    }

    pub fn duplicate_entry(&self, path: &[&str], src_name: &str, dst_name: &str) -> StoreResult<Entry> {
        let _guard = self.write();
        let parent = self.resolve(path)?;
        self.entries.duplicate(&parent, src_name, &parent, dst_name)
    }

    // ---- Binaries ----

    pub fn create_binary(&self, path: &[&str], name: &str, data: &[u8]) -> StoreResult<()> {
        let _guard = self.write();
        self.binaries.create(&self.resolve(path)?, name, data)
    }

    pub fn get_binary(&self, path: &[&str], name: &str) -> StoreResult<Vec<u8>> {
        let _guard = self.read();
        self.binaries.get(&self.resolve(path)?, name)
    }

    pub fn move_binary(&self, path: &[&str], old_name: &str, new_name: &str) -> StoreResult<()> {
        let _guard = self.write();
        self.binaries.rename(&self.resolve(path)?, old_name, new_name)
    }

    pub fn update_binary(&self, path: &[&str], name: &str, data: &[u8]) -> StoreResult<()> {
        let _guard = self.write();
        self.binaries.update(&self.resolve(path)?, name, data)
    }

    pub fn remove_binary(&self, path: &[&str], name: &str) -> StoreResult<()> {
        let _guard = self.write();
        self.binaries.remove(&self.resolve(path)?, name)
    }

    pub fn duplicate_binary(&self, path: &[&str], src_name: &str, dst_name: &str) -> StoreResult<()> {
        let _guard = self.write();
        let parent = self.resolve(path)?;
        self.binaries.duplicate(&parent, src_name, &parent, dst_name)
    }

    // ---- Internal ----

    fn resolve(&self, path: &[&str]) -> StoreResult<PathBuf> {
        Ok(resolve(&self.root, path)?)
    }

    fn read(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().expect("lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().expect("lock poisoned")
    }
}

fn to_value<T: Serialize + ?Sized>(data: &T) -> StoreResult<Value> {
    Ok(serde_json::to_value(data)?)
}
