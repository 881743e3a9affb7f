// src/error.rs
//! Public error type for the entire crate
//!
//! Every failure is fatal to a run. Variants are ordered roughly by the phase
//! in which they can occur.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RekeyError>;

#[derive(Error, Debug)]
pub enum RekeyError {
    /// Malformed or missing input. Always raised before the keyring is touched.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("settings error ({path}): {message}")]
    Settings { path: PathBuf, message: String },

    #[error("{op} failed for {path}: {source}")]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error creating tar gz file {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{action} failed for collection key file {path}: {reason}")]
    Crypto {
        action: CryptoAction,
        path: PathBuf,
        reason: String,
    },

    #[error(
        "rekey verification error, expected collection keys were missing: {ids}\n\n\
         To rollback these changes:\n\
         \t1) Untar the backup keyring tar.gz inside the root dir: tar -xzf {archive_path} -C {root}\n\
         \t2) Rename the extracted dir ({backup_path}) to \"keyring\"",
        ids = .missing.join(","),
        archive_path = .archive.display(),
        root = .backup_dir.parent().unwrap_or_else(|| std::path::Path::new(".")).display(),
        backup_path = .backup_dir.display()
    )]
    Verification {
        missing: Vec<String>,
        archive: PathBuf,
        backup_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoAction {
    Decrypt,
    Encrypt,
}

impl std::fmt::Display for CryptoAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CryptoAction::Decrypt => f.write_str("decryption"),
            CryptoAction::Encrypt => f.write_str("re-encryption"),
        }
    }
}

impl RekeyError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        RekeyError::Validation(msg.into())
    }

    pub(crate) fn filesystem(
        op: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        RekeyError::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn crypto(
        action: CryptoAction,
        path: impl Into<PathBuf>,
        reason: impl ToString,
    ) -> Self {
        RekeyError::Crypto {
            action,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
