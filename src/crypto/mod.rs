// src/crypto/mod.rs
//! Pure cryptographic operations — no I/O
//!
//! AES in CBC mode with PKCS#7 padding, the format every collection key file
//! on disk is stored in. The AES variant is picked from the master key length.
//!
//! CBC is unauthenticated: a wrong key or IV is only noticed when the padding
//! of the last block fails to validate, and roughly 1 in 256 wrong keys will
//! still "succeed" with garbage output. Callers that need integrity must check
//! it themselves.
mod decrypt;
mod encrypt;

pub use decrypt::decrypt_to_vec;
pub use encrypt::encrypt_to_vec;

use thiserror::Error;

use crate::consts::{AES_BLOCK_SIZE, AES_KEY_SIZES};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("invalid AES key length {0} (expected 16, 24 or 32 bytes)")]
    InvalidKeyLength(usize),

    #[error("ciphertext length {0} is not a positive multiple of the AES block size")]
    NotBlockAligned(usize),

    /// Bad padding. With CBC this is also what a wrong key or IV looks like.
    #[error("padding check failed (wrong key/IV or corrupt data)")]
    BadPadding,
}

/// True when `len` is an accepted AES key size.
pub fn is_aes_key_len(len: usize) -> bool {
    AES_KEY_SIZES.contains(&len)
}

pub(crate) fn check_aligned(ciphertext: &[u8]) -> Result<(), CipherError> {
    if ciphertext.is_empty() || ciphertext.len() % AES_BLOCK_SIZE != 0 {
        return Err(CipherError::NotBlockAligned(ciphertext.len()));
    }
    Ok(())
}
