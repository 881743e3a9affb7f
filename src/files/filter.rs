// src/files/filter.rs
use std::path::Path;

use crate::consts::KEY_FILE_EXTENSION;

/// Predicate selecting which files an operation applies to.
pub trait FileFilter {
    fn matches(&self, path: &Path) -> bool;
}

impl<F> FileFilter for F
where
    F: Fn(&Path) -> bool,
{
    fn matches(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Selects collection key files: regular files (not symlinks) carrying the
/// key file extension. The extension match is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFileFilter {
    extension: String,
}

impl KeyFileFilter {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }

    /// File name of the key file for `collection_id`.
    pub fn file_name(&self, collection_id: &str) -> String {
        format!("{collection_id}.{}", self.extension)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }
}

impl Default for KeyFileFilter {
    fn default() -> Self {
        Self::new(KEY_FILE_EXTENSION)
    }
}

impl FileFilter for KeyFileFilter {
    fn matches(&self, path: &Path) -> bool {
        let is_regular = std::fs::symlink_metadata(path)
            .map(|meta| meta.file_type().is_file())
            .unwrap_or(false);
        is_regular && self.has_extension(path)
    }
}
