// src/codec/record.rs
use std::fmt;

use crate::aliases::KeyMaterial;

/// A decrypted collection key, held in memory only.
///
/// The key bytes are zeroized when the record is dropped.
pub struct CollectionKeyRecord {
    collection_id: String,
    key_material: KeyMaterial,
}

impl CollectionKeyRecord {
    pub fn new(collection_id: impl Into<String>, key_material: KeyMaterial) -> Self {
        Self {
            collection_id: collection_id.into(),
            key_material,
        }
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn key_material(&self) -> &KeyMaterial {
        &self.key_material
    }
}

impl fmt::Debug for CollectionKeyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionKeyRecord")
            .field("collection_id", &self.collection_id)
            .field("key_material", &"[REDACTED]")
            .finish()
    }
}
