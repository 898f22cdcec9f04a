//! Folder objects: a directory named by identifier holding a `.info.json`.
//!
//! Create, rename and duplicate touch two filesystem objects each and are
//! written as two-step sequences with one compensating action:
//!
//! | Operation | Step 1 | Step 2 | On step 2 failure |
//! |---|---|---|---|
//! | create | create directory | create info file | remove directory |
//! | rename | rewrite info file | rename directory | report; metadata stays new |
//! | duplicate | copy directory | rewrite copied info | remove copy |
//!
//! Compensation failures are logged and never returned.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use fsentry_fs::FsErrorKind;
use fsentry_types::{folder_dir, info_file, FolderInfo, Identifier, List, ENTRY_SUFFIX};

use crate::context::Context;
use crate::error::{StoreError, StoreResult};

/// Manages folder objects under arbitrary parent directories.
#[derive(Clone, Debug)]
pub struct FolderManager {
    ctx: Context,
}

impl FolderManager {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// Create a folder under `parent`.
    pub fn create(&self, parent: &Path, name: &str, data: Value) -> StoreResult<FolderInfo> {
        let id = self.ctx.identifier(name)?;
        self.ctx.require_dir(parent)?;
        let dir = folder_dir(parent, &id);
        if self.ctx.dir_present(&dir)? {
            return Err(StoreError::exist(&dir));
        }

        let info = FolderInfo::new(&id, name, data, self.ctx.now());
        let bytes = self.ctx.encode(&info)?;

        self.ctx.filesystem().create_dir(&dir)?;
        if let Err(err) = self.ctx.filesystem().create_file(&info_file(&dir), &bytes) {
            self.ctx.discard_dir(&dir, "folder create");
            return Err(err.into());
        }

        debug!(path = %dir.display(), "folder created");
        Ok(info)
    }

    pub fn get(&self, parent: &Path, name: &str) -> StoreResult<FolderInfo> {
        let id = self.ctx.identifier(name)?;
        let dir = self.locate(parent, &id)?;
        self.read_info(&dir)
    }

    /// Rename a folder and refresh its update timestamp.
    pub fn rename(&self, parent: &Path, old_name: &str, new_name: &str) -> StoreResult<FolderInfo> {
        self.relocate(parent, old_name, new_name, true)
    }

    /// Rename a folder keeping both timestamps verbatim.
    pub fn rename_without_timestamp(
        &self,
        parent: &Path,
        old_name: &str,
        new_name: &str,
    ) -> StoreResult<FolderInfo> {
        self.relocate(parent, old_name, new_name, false)
    }

    /// Replace the payload of a folder.
    pub fn update(&self, parent: &Path, name: &str, data: Value) -> StoreResult<FolderInfo> {
        let id = self.ctx.identifier(name)?;
        let dir = self.locate(parent, &id)?;
        let info = self.read_info(&dir)?.with_data(data, self.ctx.now());
        let bytes = self.ctx.encode(&info)?;
        self.ctx.filesystem().update_file(&info_file(&dir), &bytes)?;

        debug!(path = %dir.display(), "folder updated");
        Ok(info)
    }

    /// Remove a folder and everything below it. A directory without a valid
    /// info file is refused as `Corrupted`.
    pub fn remove(&self, parent: &Path, name: &str) -> StoreResult<()> {
        let id = self.ctx.identifier(name)?;
        let dir = self.locate(parent, &id)?;
        self.read_info(&dir)?;
        self.ctx.filesystem().remove_dir_all(&dir)?;

        debug!(path = %dir.display(), "folder removed");
        Ok(())
    }

    /// Copy a folder with all its content to `dst_parent/dst_name`. The copy
    /// is a new object: its creation time is now and it has no update time.
    pub fn duplicate(
        &self,
        src_parent: &Path,
        src_name: &str,
        dst_parent: &Path,
        dst_name: &str,
    ) -> StoreResult<FolderInfo> {
        let src_id = self.ctx.identifier(src_name)?;
        let dst_id = self.ctx.identifier(dst_name)?;
        let src = self.locate(src_parent, &src_id)?;
        self.ctx.require_dir(dst_parent)?;
        let dst = folder_dir(dst_parent, &dst_id);
        if self.ctx.dir_present(&dst)? {
            return Err(StoreError::exist(&dst));
        }
        if dst.starts_with(&src) {
            return Err(StoreError::BadPath(format!(
                "cannot duplicate {} into itself",
                src.display()
            )));
        }

        let info = self.read_info(&src)?.duplicated(&dst_id, dst_name, self.ctx.now());
        let bytes = self.ctx.encode(&info)?;

        if let Err(err) = self.ctx.filesystem().copy_dir_all(&src, &dst) {
            if err.kind() != FsErrorKind::Exist {
                self.ctx.discard_dir(&dst, "folder duplicate");
            }
            return Err(err.into());
        }
        if let Err(err) = self.ctx.filesystem().update_file(&info_file(&dst), &bytes) {
            self.ctx.discard_dir(&dst, "folder duplicate");
            return Err(err.into());
        }

        debug!(from = %src.display(), to = %dst.display(), "folder duplicated");
        Ok(info)
    }

    /// Partition the immediate children of `dir` into folders, entries and
    /// corrupted folders. Hidden names and non-entry files are skipped.
    pub fn list(&self, dir: &Path) -> StoreResult<List> {
        self.ctx.require_dir(dir)?;
        let mut list = List::default();
        for child in self.ctx.filesystem().list_dir(dir)? {
            if child.name.starts_with('.') {
                continue;
            }
            if child.is_dir() {
                match self.read_info(&dir.join(&child.name)) {
                    Ok(_) => list.folders.push(child.name),
                    Err(StoreError::Corrupted(_)) => list.corrupted_folders.push(child.name),
                    Err(err) => return Err(err),
                }
            } else if child.is_file() {
                let stem = child
                    .name
                    .strip_suffix(ENTRY_SUFFIX)
                    .and_then(|s| s.strip_suffix('.'));
                if let Some(stem) = stem {
                    list.entries.push(stem.to_string());
                }
            }
        }
        list.folders.sort();
        list.entries.sort();
        list.corrupted_folders.sort();
        Ok(list)
    }

    /// Read the info file of an existing folder directory.
    pub(crate) fn read_info(&self, dir: &Path) -> StoreResult<FolderInfo> {
        let path = info_file(dir);
        let found = match self.ctx.filesystem().file_exists(&path) {
            Ok(found) => found,
            Err(err) if err.kind() == FsErrorKind::BadPath => false,
            Err(err) => return Err(err.into()),
        };
        if !found {
            return Err(StoreError::corrupted(dir, "missing info file"));
        }
        let bytes = self.ctx.filesystem().read_file(&path)?;
        self.ctx.decode(dir, &bytes)
    }

    fn relocate(
        &self,
        parent: &Path,
        old_name: &str,
        new_name: &str,
        touch: bool,
    ) -> StoreResult<FolderInfo> {
        let old_id = self.ctx.identifier(old_name)?;
        let new_id = self.ctx.identifier(new_name)?;
        let src = self.locate(parent, &old_id)?;
        let dst = folder_dir(parent, &new_id);
        let same_dir = old_id == new_id;
        if !same_dir && self.ctx.dir_present(&dst)? {
            return Err(StoreError::exist(&dst));
        }

        let touched = touch.then(|| self.ctx.now());
        let info = self.read_info(&src)?.renamed(&new_id, new_name, touched);
        let bytes = self.ctx.encode(&info)?;

        self.ctx.filesystem().update_file(&info_file(&src), &bytes)?;
        if !same_dir {
            if let Err(err) = self.ctx.filesystem().rename(&src, &dst) {
                warn!(
                    from = %src.display(),
                    to = %dst.display(),
                    error = %err,
                    "folder rename failed after metadata rewrite; folder keeps its old path"
                );
                return Err(err.into());
            }
        }

        debug!(from = %src.display(), to = %dst.display(), "folder moved");
        Ok(info)
    }

    /// Directory of an existing folder: `BadPath` for a missing parent,
    /// `NotExist` for a missing folder.
    fn locate(&self, parent: &Path, id: &Identifier) -> StoreResult<PathBuf> {
        self.ctx.require_dir(parent)?;
        let dir = folder_dir(parent, id);
        if !self.ctx.filesystem().dir_exists(&dir)? {
            return Err(StoreError::not_exist(&dir));
        }
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use fsentry_fs::{Fault, FaultyFilesystem, Filesystem, FsOp, LocalFilesystem};
    use serde_json::json;

    use crate::error::StoreErrorKind;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn t1() -> DateTime<Utc> {
        t0() + Duration::hours(1)
    }

    fn setup() -> (tempfile::TempDir, FolderManager) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context::new(Arc::new(LocalFilesystem::new()));
        (dir, FolderManager::new(ctx))
    }

    fn setup_faulty() -> (
        tempfile::TempDir,
        Arc<FaultyFilesystem<LocalFilesystem>>,
        FolderManager,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let fs = Arc::new(FaultyFilesystem::new(LocalFilesystem::new()));
        let ctx = Context::new(fs.clone());
        (dir, fs, FolderManager::new(ctx))
    }

    // ---- create / get ----

    #[test]
    fn create_then_get() {
        let (root, folders) = setup();
        let created = folders
            .create(root.path(), "Project A", json!({"tag": 1}))
            .unwrap();
        assert_eq!(created.id, "project_a");
        assert_eq!(created.name, "Project A");
        assert!(created.updated_at.is_none());
        assert!(root.path().join("project_a").join(".info.json").is_file());

        let got = folders.get(root.path(), "Project A").unwrap();
        assert_eq!(got, created);
    }

    #[test]
    fn create_rejects_bad_name_before_io() {
        let (root, folders) = setup();
        for name in ["", "%%%", "con", "NUL", "Lpt1"] {
            let err = folders.create(root.path(), name, json!(null)).unwrap_err();
            assert_eq!(err.kind(), StoreErrorKind::BadName, "{name:?}");
        }
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn create_in_missing_parent_is_bad_path() {
        let (root, folders) = setup();
        let err = folders
            .create(&root.path().join("missing"), "a", json!(null))
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::BadPath);
    }

    #[test]
    fn create_twice_is_exist() {
        let (root, folders) = setup();
        folders.create(root.path(), "a", json!(null)).unwrap();
        let err = folders.create(root.path(), "A", json!(null)).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Exist);
    }

    #[test]
    fn get_missing_is_not_exist() {
        let (root, folders) = setup();
        let err = folders.get(root.path(), "nope").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::NotExist);
    }

    #[test]
    fn get_without_info_is_corrupted() {
        let (root, folders) = setup();
        std::fs::create_dir(root.path().join("bare")).unwrap();
        let err = folders.get(root.path(), "bare").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Corrupted);
    }

    #[test]
    fn get_with_garbage_info_is_corrupted() {
        let (root, folders) = setup();
        let dir = root.path().join("junk");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join(".info.json"), b"{not json").unwrap();
        let err = folders.get(root.path(), "junk").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Corrupted);
    }

    #[test]
    fn pretty_info_is_tab_indented() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context::new(Arc::new(LocalFilesystem::new())).pretty(true);
        let folders = FolderManager::new(ctx);
        folders.create(root.path(), "p", json!({"k": "v"})).unwrap();
        let raw = std::fs::read_to_string(root.path().join("p").join(".info.json")).unwrap();
        assert!(raw.contains("\n\t\"id\""));
        assert_eq!(folders.get(root.path(), "p").unwrap().data, json!({"k": "v"}));
    }

    // ---- create rollback ----

    #[test]
    fn create_removes_directory_when_info_write_fails() {
        let (root, fs, folders) = setup_faulty();
        fs.inject(FsOp::CreateFile, Fault::always(FsErrorKind::Permission));
        let err = folders.create(root.path(), "a", json!(null)).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Permission);
        assert!(!root.path().join("a").exists());
    }

    #[test]
    fn create_cleanup_failure_returns_original_error() {
        let (root, fs, folders) = setup_faulty();
        fs.inject(FsOp::CreateFile, Fault::always(FsErrorKind::Internal));
        fs.inject(FsOp::RemoveDirAll, Fault::always(FsErrorKind::Permission));
        let err = folders.create(root.path(), "a", json!(null)).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Internal);
        assert_eq!(fs.calls(FsOp::RemoveDirAll), 1);
        // Left behind as a corrupted folder.
        assert!(root.path().join("a").is_dir());
        assert_eq!(
            folders.get(root.path(), "a").unwrap_err().kind(),
            StoreErrorKind::Corrupted
        );
    }

    // ---- rename ----

    #[test]
    fn rename_moves_directory_and_metadata() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context::new(Arc::new(LocalFilesystem::new())).with_clock(t0);
        FolderManager::new(ctx.clone())
            .create(root.path(), "Old", json!({"n": 1}))
            .unwrap();
        std::fs::write(root.path().join("old").join("child.json"), b"{}").unwrap();

        let folders = FolderManager::new(ctx.with_clock(t1));
        let moved = folders.rename(root.path(), "Old", "New Name").unwrap();
        assert_eq!(moved.id, "new_name");
        assert_eq!(moved.name, "New Name");
        assert_eq!(moved.created_at, t0());
        assert_eq!(moved.updated_at, Some(t1()));
        assert!(root.path().join("new_name").join("child.json").is_file());

        assert_eq!(folders.get(root.path(), "New Name").unwrap(), moved);
        assert_eq!(
            folders.get(root.path(), "Old").unwrap_err().kind(),
            StoreErrorKind::NotExist
        );
    }

    #[test]
    fn rename_without_timestamp_keeps_both() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context::new(Arc::new(LocalFilesystem::new())).with_clock(t0);
        let created = FolderManager::new(ctx.clone())
            .create(root.path(), "a", json!(null))
            .unwrap();

        let folders = FolderManager::new(ctx.with_clock(t1));
        let moved = folders.rename_without_timestamp(root.path(), "a", "b").unwrap();
        assert_eq!(moved.created_at, created.created_at);
        assert_eq!(moved.updated_at, None);
    }

    #[test]
    fn rename_same_identifier_only_rewrites_name() {
        let (root, folders) = setup();
        folders.create(root.path(), "notes", json!(null)).unwrap();
        let moved = folders.rename(root.path(), "notes", "Notes").unwrap();
        assert_eq!(moved.id, "notes");
        assert_eq!(moved.name, "Notes");
        assert_eq!(folders.get(root.path(), "notes").unwrap().name, "Notes");
    }

    #[test]
    fn rename_onto_existing_is_exist() {
        let (root, folders) = setup();
        folders.create(root.path(), "a", json!(null)).unwrap();
        folders.create(root.path(), "b", json!(null)).unwrap();
        let err = folders.rename(root.path(), "a", "b").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Exist);
        assert_eq!(folders.get(root.path(), "a").unwrap().name, "a");
    }

    #[test]
    fn rename_missing_is_not_exist() {
        let (root, folders) = setup();
        let err = folders.rename(root.path(), "a", "b").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::NotExist);
    }

    #[test]
    fn rename_failure_leaves_new_metadata_at_old_path() {
        let (root, fs, folders) = setup_faulty();
        folders.create(root.path(), "old", json!({"n": 1})).unwrap();
        fs.inject(FsOp::Rename, Fault::always(FsErrorKind::Internal));

        let err = folders.rename(root.path(), "old", "new").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Internal);

        let raw = fs
            .inner()
            .read_file(&root.path().join("old").join(".info.json"))
            .unwrap();
        let info: FolderInfo = serde_json::from_slice(&raw).unwrap();
        assert_eq!(info.id, "new");
        assert_eq!(info.data, json!({"n": 1}));
        assert!(!root.path().join("new").exists());
    }

    #[test]
    fn rename_metadata_failure_changes_nothing() {
        let (root, fs, folders) = setup_faulty();
        folders.create(root.path(), "old", json!(null)).unwrap();
        fs.inject(FsOp::UpdateFile, Fault::always(FsErrorKind::Permission));

        let err = folders.rename(root.path(), "old", "new").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Permission);
        fs.clear_all();
        assert_eq!(folders.get(root.path(), "old").unwrap().id, "old");
        assert_eq!(fs.calls(FsOp::Rename), 0);
    }

    // ---- update / remove ----

    #[test]
    fn update_replaces_payload() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context::new(Arc::new(LocalFilesystem::new())).with_clock(t0);
        FolderManager::new(ctx.clone())
            .create(root.path(), "a", json!({"v": 1}))
            .unwrap();

        let folders = FolderManager::new(ctx.with_clock(t1));
        let updated = folders.update(root.path(), "a", json!({"v": 2})).unwrap();
        assert_eq!(updated.data, json!({"v": 2}));
        assert_eq!(updated.created_at, t0());
        assert_eq!(updated.updated_at, Some(t1()));
        assert_eq!(folders.get(root.path(), "a").unwrap(), updated);
    }

    #[test]
    fn update_missing_is_not_exist() {
        let (root, folders) = setup();
        let err = folders.update(root.path(), "a", json!(null)).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::NotExist);
    }

    #[test]
    fn remove_deletes_recursively() {
        let (root, folders) = setup();
        folders.create(root.path(), "a", json!(null)).unwrap();
        folders.create(&root.path().join("a"), "b", json!(null)).unwrap();
        folders.remove(root.path(), "a").unwrap();
        assert!(!root.path().join("a").exists());
        assert_eq!(
            folders.get(root.path(), "a").unwrap_err().kind(),
            StoreErrorKind::NotExist
        );
    }

    #[test]
    fn remove_refuses_corrupted_folder() {
        let (root, folders) = setup();
        std::fs::create_dir(root.path().join("bare")).unwrap();
        let err = folders.remove(root.path(), "bare").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Corrupted);
        assert!(root.path().join("bare").is_dir());
    }

    #[test]
    fn remove_missing_is_not_exist() {
        let (root, folders) = setup();
        let err = folders.remove(root.path(), "a").unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::NotExist);
    }

    // ---- list ----

    #[test]
    fn list_partitions_children() {
        let (root, folders) = setup();
        folders.create(root.path(), "Zeta", json!(null)).unwrap();
        folders.create(root.path(), "alpha", json!(null)).unwrap();
        std::fs::create_dir(root.path().join("broken")).unwrap();
        std::fs::write(root.path().join("notes.json"), b"{}").unwrap();
        std::fs::write(root.path().join("a_doc.json"), b"{}").unwrap();
        std::fs::write(root.path().join("image.bin"), b"raw").unwrap();
        std::fs::write(root.path().join(".hidden.json"), b"{}").unwrap();
        std::fs::write(root.path().join("readme.txt"), b"").unwrap();
        std::fs::create_dir(root.path().join(".cache")).unwrap();

        let list = folders.list(root.path()).unwrap();
        assert_eq!(list.folders, vec!["alpha", "zeta"]);
        assert_eq!(list.entries, vec!["a_doc", "notes"]);
        assert_eq!(list.corrupted_folders, vec!["broken"]);
    }

    #[test]
    fn list_empty_and_missing() {
        let (root, folders) = setup();
        assert!(folders.list(root.path()).unwrap().is_empty());
        assert_eq!(
            folders
                .list(&root.path().join("missing"))
                .unwrap_err()
                .kind(),
            StoreErrorKind::BadPath
        );
    }

    // ---- duplicate ----

    #[test]
    fn duplicate_resets_lifecycle_and_copies_content() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context::new(Arc::new(LocalFilesystem::new())).with_clock(t0);
        let early = FolderManager::new(ctx.clone());
        early.create(root.path(), "A", json!({"k": 1})).unwrap();
        early.update(root.path(), "A", json!({"k": 2})).unwrap();
        std::fs::write(root.path().join("a").join("inner.bin"), b"raw").unwrap();

        let folders = FolderManager::new(ctx.with_clock(t1));
        let copy = folders
            .duplicate(root.path(), "A", root.path(), "B")
            .unwrap();
        assert_eq!(copy.id, "b");
        assert_eq!(copy.name, "B");
        assert_eq!(copy.created_at, t1());
        assert!(copy.updated_at.is_none());
        assert_eq!(copy.data, json!({"k": 2}));
        assert_eq!(
            std::fs::read(root.path().join("b").join("inner.bin")).unwrap(),
            b"raw"
        );

        let original = folders.get(root.path(), "A").unwrap();
        assert_eq!(original.id, "a");
        assert_eq!(original.created_at, t0());
    }

    #[test]
    fn duplicate_into_other_parent() {
        let (root, folders) = setup();
        folders.create(root.path(), "src", json!(null)).unwrap();
        folders.create(root.path(), "target", json!(null)).unwrap();
        let target = root.path().join("target");
        folders
            .duplicate(root.path(), "src", &target, "copy")
            .unwrap();
        assert_eq!(folders.get(&target, "copy").unwrap().name, "copy");
    }

    #[test]
    fn duplicate_into_itself_is_rejected() {
        let (root, folders) = setup();
        folders.create(root.path(), "a", json!(null)).unwrap();
        let inside = root.path().join("a");
        let err = folders
            .duplicate(root.path(), "a", &inside, "b")
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::BadPath);
        assert!(!inside.join("b").exists());
    }

    #[test]
    fn duplicate_onto_existing_is_exist() {
        let (root, folders) = setup();
        folders.create(root.path(), "a", json!(null)).unwrap();
        folders.create(root.path(), "b", json!(null)).unwrap();
        let err = folders
            .duplicate(root.path(), "a", root.path(), "b")
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Exist);
    }

    #[test]
    fn duplicate_removes_partial_copy() {
        let (root, fs, folders) = setup_faulty();
        folders.create(root.path(), "a", json!(null)).unwrap();
        fs.inject(
            FsOp::CopyDirAll,
            Fault::always(FsErrorKind::Internal).with_effect(),
        );
        let err = folders
            .duplicate(root.path(), "a", root.path(), "b")
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Internal);
        assert!(!root.path().join("b").exists());
    }

    #[test]
    fn duplicate_removes_copy_when_info_rewrite_fails() {
        let (root, fs, folders) = setup_faulty();
        folders.create(root.path(), "a", json!(null)).unwrap();
        fs.inject(FsOp::UpdateFile, Fault::always(FsErrorKind::Permission));
        let err = folders
            .duplicate(root.path(), "a", root.path(), "b")
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Permission);
        assert!(!root.path().join("b").exists());
        assert!(root.path().join("a").is_dir());
    }
}
