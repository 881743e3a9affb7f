// src/codec/decryptor.rs
use std::path::Path;

use tracing::{debug, info};

use super::CollectionKeyRecord;
use crate::aliases::{InitVector, MasterKey};
use crate::crypto::{decrypt_to_vec, is_aes_key_len};
use crate::error::{CryptoAction, RekeyError, Result};
use crate::files::{FilesHelper, KeyFileFilter, LocalFiles};

pub trait KeyDecryptor {
    /// Decrypt every key file in `keyring_dir` under `key`/`iv`.
    ///
    /// Records come back in file name order. The first failure aborts the
    /// batch with [`RekeyError::Crypto`] naming the offending file.
    fn decrypt_keys(
        &self,
        keyring_dir: &Path,
        key: &MasterKey,
        iv: &InitVector,
    ) -> Result<Vec<CollectionKeyRecord>>;
}

/// Reads key files from the local disk, selecting them with a [`KeyFileFilter`].
#[derive(Debug, Clone, Default)]
pub struct FileKeyDecryptor {
    filter: KeyFileFilter,
}

impl FileKeyDecryptor {
    pub fn new(filter: KeyFileFilter) -> Self {
        Self { filter }
    }

    fn decrypt_key(
        &self,
        key_file: &Path,
        key: &MasterKey,
        iv: &InitVector,
    ) -> Result<CollectionKeyRecord> {
        let fail = |reason: String| RekeyError::crypto(CryptoAction::Decrypt, key_file, reason);

        let collection_id = key_file
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| fail("file name is not valid UTF-8".into()))?;

        let ciphertext = std::fs::read(key_file).map_err(|e| fail(e.to_string()))?;
        let material = decrypt_to_vec(&ciphertext, key, iv).map_err(|e| fail(e.to_string()))?;

        let len = material.expose_secret().len();
        if !is_aes_key_len(len) {
            return Err(fail(format!(
                "decrypted key is {len} bytes, not a valid AES key size"
            )));
        }

        Ok(CollectionKeyRecord::new(collection_id, material))
    }
}

impl KeyDecryptor for FileKeyDecryptor {
    fn decrypt_keys(
        &self,
        keyring_dir: &Path,
        key: &MasterKey,
        iv: &InitVector,
    ) -> Result<Vec<CollectionKeyRecord>> {
        let key_files = LocalFiles.list_files(keyring_dir, &self.filter)?;
        info!(total = key_files.len(), "decrypting existing collection keys");

        let mut records = Vec::with_capacity(key_files.len());
        for path in &key_files {
            let record = self.decrypt_key(path, key, iv)?;
            debug!(collection = record.collection_id(), "decrypted");
            records.push(record);
        }

        info!(count = records.len(), "successfully decrypted existing collection keys");
        Ok(records)
    }
}
