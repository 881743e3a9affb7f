// src/codec/mod.rs
//! Batch decryption and re-encryption of collection key files
//!
//! One file per collection, named `<collection id>.<ext>`, holding the raw
//! AES-CBC ciphertext of that collection's key. Every file in a batch shares
//! the same master key and IV.

mod decryptor;
mod encryptor;
mod record;

pub use decryptor::{FileKeyDecryptor, KeyDecryptor};
pub use encryptor::{FileKeyEncryptor, KeyEncryptor};
pub use record::CollectionKeyRecord;
