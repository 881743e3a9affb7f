// src/files/archive.rs
//! tar.gz snapshots of a directory tree

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use walkdir::WalkDir;

use super::FileFilter;
use crate::consts::BACKUP_ARCHIVE_SUFFIX;
use crate::error::{RekeyError, Result};

pub trait FileArchiver {
    /// Write a gzip-compressed tar of every file under `src` accepted by
    /// `filter` to `dest`. Returns the number of entries written.
    ///
    /// A partially written archive is left in place on failure.
    fn create_tar_gz(&self, src: &Path, dest: &Path, filter: &dyn FileFilter) -> Result<usize>;
}

/// Archiver writing entries as `<archive root>/<path relative to src>`.
///
/// Symlinks are skipped and directories are never written as entries, so
/// unpacking reproduces a single top-level folder holding only the
/// selected files.
#[derive(Debug, Clone, Copy)]
pub struct TarGzArchiver {
    level: Compression,
}

impl TarGzArchiver {
    pub fn new(level: Compression) -> Self {
        Self { level }
    }
}

impl Default for TarGzArchiver {
    fn default() -> Self {
        Self::new(Compression::default())
    }
}

impl FileArchiver for TarGzArchiver {
    fn create_tar_gz(&self, src: &Path, dest: &Path, filter: &dyn FileFilter) -> Result<usize> {
        let archive_err = |source: io::Error| RekeyError::Archive {
            path: dest.to_path_buf(),
            source,
        };

        let root = PathBuf::from(archive_root_name(dest));
        let file = File::create(dest).map_err(archive_err)?;
        let encoder = GzEncoder::new(BufWriter::new(file), self.level);
        let mut builder = tar::Builder::new(encoder);

        let mut count = 0;
        for entry in WalkDir::new(src).follow_links(false).sort_by_file_name() {
            let entry = entry.map_err(|e| archive_err(e.into()))?;
            if !entry.file_type().is_file() || !filter.matches(entry.path()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(src)
                .map_err(|e| archive_err(io::Error::other(e)))?;
            builder
                .append_path_with_name(entry.path(), root.join(relative))
                .map_err(archive_err)?;
            count += 1;
            tracing::debug!(file = %entry.path().display(), "archived");
        }

        let writer = builder
            .into_inner()
            .and_then(GzEncoder::finish)
            .map_err(archive_err)?;
        let file = writer.into_inner().map_err(|e| archive_err(e.into_error()))?;
        file.sync_all().map_err(archive_err)?;

        Ok(count)
    }
}

/// Top-level folder name used inside an archive: the archive's file name with
/// the `.tar.gz` suffix removed.
pub fn archive_root_name(archive: &Path) -> String {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(BACKUP_ARCHIVE_SUFFIX) {
        Some(stem) => stem.to_owned(),
        None => name,
    }
}
