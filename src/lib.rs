// src/lib.rs
//! keyring-rekey — re-encrypt a collection keyring under a new master key
//!
//! Features:
//! - AES-CBC/PKCS#7 collection key files, one per collection
//! - tar.gz backup of the original keyring before anything is rewritten
//! - Post-run completeness verification with rollback instructions
//! - secure-gate secret containers for every key, IV and decrypted key

pub mod aliases;
pub mod codec;
pub mod config;
pub mod consts;
pub mod context;
pub mod crypto;
pub mod error;
pub mod files;
pub mod rekey;

// Re-export everything users need at the crate root
pub use aliases::{CypherText, InitVector, KeyMaterial, MasterKey};
pub use codec::{
    CollectionKeyRecord, FileKeyDecryptor, FileKeyEncryptor, KeyDecryptor, KeyEncryptor,
};
pub use config::{load as load_settings, Settings};
pub use context::{ConfigResolver, ContextResolver, OperationContext, RekeyInputs};
pub use error::{CryptoAction, RekeyError, Result};
pub use files::{
    FileArchiver, FileFilter, FilesHelper, KeyFileFilter, LocalFiles, TarGzArchiver,
};
pub use rekey::{Phase, RekeyCommand, RekeyReport};
