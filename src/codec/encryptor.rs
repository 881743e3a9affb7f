// src/codec/encryptor.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use super::CollectionKeyRecord;
use crate::aliases::{InitVector, MasterKey};
use crate::crypto::encrypt_to_vec;
use crate::error::{CryptoAction, RekeyError, Result};
use crate::files::KeyFileFilter;

pub trait KeyEncryptor {
    /// Encrypt each record under `key`/`iv` into `dest/<collection id>.<ext>`,
    /// overwriting existing files.
    ///
    /// Records are consumed; their key material is zeroized as they drop.
    fn encrypt_keys(
        &self,
        records: Vec<CollectionKeyRecord>,
        dest: &Path,
        key: &MasterKey,
        iv: &InitVector,
    ) -> Result<()>;
}

/// Writes one ciphertext file per record.
///
/// The same IV is used for every record in the batch. This matches the
/// existing on-disk format but means two collections holding the same key
/// produce identical files.
#[derive(Debug, Clone, Default)]
pub struct FileKeyEncryptor {
    filter: KeyFileFilter,
}

impl FileKeyEncryptor {
    pub fn new(filter: KeyFileFilter) -> Self {
        Self { filter }
    }

    fn encrypt_key(
        &self,
        record: &CollectionKeyRecord,
        dest: &Path,
        key: &MasterKey,
        iv: &InitVector,
    ) -> Result<()> {
        let target = dest.join(self.filter.file_name(record.collection_id()));
        let fail = |reason: String| RekeyError::crypto(CryptoAction::Encrypt, &target, reason);

        let ciphertext = encrypt_to_vec(record.key_material().expose_secret(), key, iv)
            .map_err(|e| fail(e.to_string()))?;

        let mut file = File::create(&target).map_err(|e| fail(e.to_string()))?;
        file.write_all(ciphertext.expose_secret())
            .and_then(|()| file.sync_all())
            .map_err(|e| fail(e.to_string()))?;
        Ok(())
    }
}

impl KeyEncryptor for FileKeyEncryptor {
    fn encrypt_keys(
        &self,
        records: Vec<CollectionKeyRecord>,
        dest: &Path,
        key: &MasterKey,
        iv: &InitVector,
    ) -> Result<()> {
        info!(total = records.len(), dest = %dest.display(), "re-encrypting collection keys");

        let total = records.len();
        for record in records {
            self.encrypt_key(&record, dest, key, iv)?;
            debug!(collection = record.collection_id(), "re-encrypted");
        }

        info!(count = total, "successfully re-encrypted collection keys");
        Ok(())
    }
}
