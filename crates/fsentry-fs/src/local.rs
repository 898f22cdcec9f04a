use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{FsError, FsErrorKind, Result};
use crate::traits::{DirEntry, DirEntryKind, Filesystem};

/// [`Filesystem`] backed by the host's disk through `std::fs`.
///
/// Writes are followed by `sync_all` so a successful return means the data
/// reached the device as far as the OS reports it.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

fn write_synced(mut file: fs::File, path: &Path, data: &[u8]) -> Result<()> {
    file.write_all(data)
        .map_err(|e| FsError::classify(e, path, FsErrorKind::NotExist))?;
    file.sync_all()
        .map_err(|e| FsError::classify(e, path, FsErrorKind::NotExist))?;
    Ok(())
}

/// A directory where a file is expected counts as "no such file".
fn file_expected(err: io::Error, path: &Path) -> FsError {
    if err.kind() == io::ErrorKind::IsADirectory {
        return FsError::NotExist(path.to_path_buf());
    }
    FsError::classify(err, path, FsErrorKind::NotExist)
}

impl Filesystem for LocalFilesystem {
    fn create_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| FsError::classify(e, path, FsErrorKind::BadPath))?;
        write_synced(file, path, data)?;
        debug!(path = %path.display(), len = data.len(), "created file");
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| file_expected(e, path))
    }

    fn update_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false) {
            return Err(FsError::NotExist(path.to_path_buf()));
        }
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(path)
            .map_err(|e| file_expected(e, path))?;
        write_synced(file, path, data)?;
        debug!(path = %path.display(), len = data.len(), "updated file");
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| file_expected(e, path))?;
        debug!(path = %path.display(), "removed file");
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> Result<()> {
        fs::create_dir(path).map_err(|e| FsError::classify(e, path, FsErrorKind::BadPath))?;
        debug!(path = %path.display(), "created directory");
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|e| FsError::classify(e, path, FsErrorKind::BadPath))?;
        debug!(path = %path.display(), "created directory tree");
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        match fs::remove_dir_all(path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed directory tree");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FsError::classify(e, path, FsErrorKind::NotExist)),
        }
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|e| FsError::classify(e, from, FsErrorKind::NotExist))?;
        debug!(from = %from.display(), to = %to.display(), "renamed");
        Ok(())
    }

    fn copy_dir_all(&self, from: &Path, to: &Path) -> Result<()> {
        if !self.dir_exists(from)? {
            return Err(FsError::NotExist(from.to_path_buf()));
        }
        if fs::symlink_metadata(to).is_ok() {
            return Err(FsError::Exist(to.to_path_buf()));
        }

        for entry in WalkDir::new(from).follow_links(false) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                match e.into_io_error() {
                    Some(io_err) => FsError::classify(io_err, &path, FsErrorKind::NotExist),
                    None => FsError::Internal {
                        path,
                        reason: "filesystem loop while copying".into(),
                    },
                }
            })?;
            let relative = entry.path().strip_prefix(from).map_err(|e| FsError::Internal {
                path: entry.path().to_path_buf(),
                reason: e.to_string(),
            })?;
            let target = to.join(relative);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                fs::create_dir(&target)
                    .map_err(|e| FsError::classify(e, &target, FsErrorKind::BadPath))?;
            } else if file_type.is_file() {
                fs::copy(entry.path(), &target)
                    .map_err(|e| FsError::classify(e, &target, FsErrorKind::BadPath))?;
            } else {
                warn!(path = %entry.path().display(), "skipping non-regular file while copying");
            }
        }

        debug!(from = %from.display(), to = %to.display(), "copied directory tree");
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let read_dir =
            fs::read_dir(path).map_err(|e| FsError::classify(e, path, FsErrorKind::NotExist))?;

        let mut entries = Vec::new();
        for item in read_dir {
            let item = item.map_err(|e| FsError::classify(e, path, FsErrorKind::NotExist))?;
            let Ok(name) = item.file_name().into_string() else {
                warn!(dir = %path.display(), "skipping non UTF-8 file name");
                continue;
            };
            let kind = match item.file_type() {
                Ok(t) if t.is_dir() => DirEntryKind::Dir,
                Ok(t) if t.is_file() => DirEntryKind::File,
                Ok(_) => DirEntryKind::Other,
                Err(e) => return Err(FsError::classify(e, &item.path(), FsErrorKind::NotExist)),
            };
            entries.push(DirEntry { name, kind });
        }
        Ok(entries)
    }

    fn file_exists(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Err(FsError::BadPath(path.to_path_buf())),
            Ok(_) => Ok(true),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(FsError::classify(e, path, FsErrorKind::NotExist)),
        }
    }

    fn dir_exists(&self, path: &Path) -> Result<bool> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_dir() => Ok(true),
            Ok(_) => Err(FsError::BadPath(path.to_path_buf())),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(FsError::classify(e, path, FsErrorKind::NotExist)),
        }
    }
}

fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
