// src/context.rs
//! Input validation and the immutable per-run operation context
//!
//! Nothing here mutates the filesystem: resolving only reads directory
//! metadata, so any error from this module leaves the keyring untouched.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{Local, NaiveDateTime};
use zeroize::Zeroize;

use crate::aliases::{InitVector, MasterKey};
use crate::config::Layout;
use crate::consts::{AES_BLOCK_SIZE, BACKUP_ARCHIVE_SUFFIX, BACKUP_TIMESTAMP_FORMAT};
use crate::crypto::is_aes_key_len;
use crate::error::{RekeyError, Result};

/// Standard alphabet; trailing `=` padding is optional on input.
const KEY_DECODER: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Raw, unvalidated run inputs as they arrive from the command line.
///
/// The base64 strings are wiped when the value is dropped.
#[derive(Clone, Default)]
pub struct RekeyInputs {
    pub key: String,
    pub iv: String,
    pub new_key: String,
    pub new_iv: String,
    pub root_dir: PathBuf,
}

impl RekeyInputs {
    pub fn new(
        key: impl Into<String>,
        iv: impl Into<String>,
        new_key: impl Into<String>,
        new_iv: impl Into<String>,
        root_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            key: key.into(),
            iv: iv.into(),
            new_key: new_key.into(),
            new_iv: new_iv.into(),
            root_dir: root_dir.into(),
        }
    }
}

impl Drop for RekeyInputs {
    fn drop(&mut self) {
        self.key.zeroize();
        self.iv.zeroize();
        self.new_key.zeroize();
        self.new_iv.zeroize();
    }
}

impl fmt::Debug for RekeyInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RekeyInputs")
            .field("root_dir", &self.root_dir)
            .finish_non_exhaustive()
    }
}

/// Everything one rekey run needs, validated up front.
pub struct OperationContext {
    current_key: MasterKey,
    current_iv: InitVector,
    new_key: MasterKey,
    new_iv: InitVector,
    root_dir: PathBuf,
    keyring_dir: PathBuf,
    keyring_backup_dir: PathBuf,
    keyring_backup_archive: PathBuf,
}

impl OperationContext {
    pub fn current_key(&self) -> &MasterKey {
        &self.current_key
    }

    pub fn current_iv(&self) -> &InitVector {
        &self.current_iv
    }

    pub fn new_key(&self) -> &MasterKey {
        &self.new_key
    }

    pub fn new_iv(&self) -> &InitVector {
        &self.new_iv
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn keyring_dir(&self) -> &Path {
        &self.keyring_dir
    }

    pub fn keyring_backup_dir(&self) -> &Path {
        &self.keyring_backup_dir
    }

    pub fn keyring_backup_archive(&self) -> &Path {
        &self.keyring_backup_archive
    }
}

// Key and IV bytes must never end up in logs.
impl fmt::Debug for OperationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationContext")
            .field("current_key", &"[REDACTED]")
            .field("current_iv", &"[REDACTED]")
            .field("new_key", &"[REDACTED]")
            .field("new_iv", &"[REDACTED]")
            .field("root_dir", &self.root_dir)
            .field("keyring_dir", &self.keyring_dir)
            .field("keyring_backup_dir", &self.keyring_backup_dir)
            .field("keyring_backup_archive", &self.keyring_backup_archive)
            .finish()
    }
}

pub trait ConfigResolver {
    fn resolve(&self, inputs: &RekeyInputs) -> Result<OperationContext>;
}

/// Resolves inputs against a directory [`Layout`], stamping the backup name
/// with the local wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct ContextResolver {
    layout: Layout,
}

impl ContextResolver {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Same as [`ConfigResolver::resolve`] with an explicit timestamp.
    pub fn resolve_at(&self, inputs: &RekeyInputs, now: NaiveDateTime) -> Result<OperationContext> {
        let current_key = parse_key("secret key", &inputs.key)?;
        let current_iv = parse_iv("init vector", &inputs.iv)?;
        let new_key = parse_key("new secret key", &inputs.new_key)?;
        let new_iv = parse_iv("new init vector", &inputs.new_iv)?;

        if inputs.root_dir.as_os_str().is_empty() {
            return Err(RekeyError::validation(
                "keyring root dir value required but was empty",
            ));
        }
        let root_dir = validate_dir(inputs.root_dir.clone())?;
        let keyring_dir = validate_dir(root_dir.join(&self.layout.keyring_dir))?;

        let keyring_backup_dir = root_dir.join(backup_dir_name(&self.layout.backup_prefix, now));
        let mut archive = keyring_backup_dir.clone().into_os_string();
        archive.push(BACKUP_ARCHIVE_SUFFIX);

        Ok(OperationContext {
            current_key,
            current_iv,
            new_key,
            new_iv,
            root_dir,
            keyring_dir,
            keyring_backup_dir,
            keyring_backup_archive: PathBuf::from(archive),
        })
    }
}

impl ConfigResolver for ContextResolver {
    fn resolve(&self, inputs: &RekeyInputs) -> Result<OperationContext> {
        self.resolve_at(inputs, Local::now().naive_local())
    }
}

/// `<prefix>-<yy-MM-dd-HHmmssSSS>`
pub fn backup_dir_name(prefix: &str, now: NaiveDateTime) -> String {
    format!("{prefix}-{}", now.format(BACKUP_TIMESTAMP_FORMAT))
}

fn decode_base64(label: &str, value: &str) -> Result<Vec<u8>> {
    if value.is_empty() {
        return Err(RekeyError::validation(format!(
            "{label} value required but was empty"
        )));
    }
    KEY_DECODER
        .decode(value)
        .map_err(|e| RekeyError::validation(format!("error Base64 decoding {label}: {e}")))
}

fn parse_key(label: &str, value: &str) -> Result<MasterKey> {
    let mut bytes = decode_base64(label, value)?;
    if !is_aes_key_len(bytes.len()) {
        let len = bytes.len();
        bytes.zeroize();
        return Err(RekeyError::validation(format!(
            "{label} decodes to {len} bytes, expected 16, 24 or 32"
        )));
    }
    // Moved, not copied: the decoded buffer becomes the secret's storage.
    Ok(MasterKey::new(bytes))
}

fn parse_iv(label: &str, value: &str) -> Result<InitVector> {
    let mut bytes = decode_base64(label, value)?;
    if bytes.len() != AES_BLOCK_SIZE {
        let len = bytes.len();
        bytes.zeroize();
        return Err(RekeyError::validation(format!(
            "{label} decodes to {len} bytes, expected {AES_BLOCK_SIZE}"
        )));
    }

    let mut raw = [0u8; AES_BLOCK_SIZE];
    raw.copy_from_slice(&bytes);
    bytes.zeroize();
    let iv = InitVector::new(raw);
    raw.zeroize();
    Ok(iv)
}

fn validate_dir(path: PathBuf) -> Result<PathBuf> {
    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => Ok(path),
        Ok(_) => Err(RekeyError::validation(format!(
            "{} is a file but expected directory",
            path.display()
        ))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(RekeyError::validation(format!(
            "{} dir required but does not exist",
            path.display()
        ))),
        Err(e) => Err(RekeyError::validation(format!(
            "{} could not be inspected: {e}",
            path.display()
        ))),
    }
}
