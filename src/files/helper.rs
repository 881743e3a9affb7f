// src/files/helper.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::FileFilter;
use crate::error::{RekeyError, Result};

/// Directory-level operations the orchestrator relies on.
///
/// Every failure surfaces as [`RekeyError::Filesystem`] naming the path.
pub trait FilesHelper {
    /// Move `src` to `dest`. Fails if `dest` already exists.
    fn move_dir(&self, src: &Path, dest: &Path) -> Result<()>;

    /// Create a single new directory. Fails if it already exists.
    fn create_dir(&self, target: &Path) -> Result<PathBuf>;

    /// Recursively delete a directory and everything under it.
    fn delete_dir(&self, target: &Path) -> Result<()>;

    /// Direct children of `src` accepted by `filter`, sorted by path.
    fn list_files(&self, src: &Path, filter: &dyn FileFilter) -> Result<Vec<PathBuf>>;

    fn exists(&self, path: &Path) -> bool;
}

/// [`FilesHelper`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl FilesHelper for LocalFiles {
    fn move_dir(&self, src: &Path, dest: &Path) -> Result<()> {
        // rename(2) silently replaces an empty destination directory
        if fs::symlink_metadata(dest).is_ok() {
            return Err(RekeyError::filesystem(
                "move",
                dest,
                io::Error::new(io::ErrorKind::AlreadyExists, "destination already exists"),
            ));
        }
        fs::rename(src, dest).map_err(|e| RekeyError::filesystem("move", src, e))
    }

    fn create_dir(&self, target: &Path) -> Result<PathBuf> {
        fs::create_dir(target).map_err(|e| RekeyError::filesystem("create dir", target, e))?;
        Ok(target.to_path_buf())
    }

    fn delete_dir(&self, target: &Path) -> Result<()> {
        fs::remove_dir_all(target).map_err(|e| RekeyError::filesystem("delete dir", target, e))
    }

    fn list_files(&self, src: &Path, filter: &dyn FileFilter) -> Result<Vec<PathBuf>> {
        let list_err = |e| RekeyError::filesystem("list files", src, e);

        let mut files = Vec::new();
        for entry in fs::read_dir(src).map_err(list_err)? {
            let path = entry.map_err(list_err)?.path();
            if filter.matches(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
