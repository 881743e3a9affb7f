// src/crypto/decrypt.rs
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockCipher, BlockDecryptMut, KeyInit, KeyIvInit};

use super::{check_aligned, CipherError};
use crate::aliases::{InitVector, KeyMaterial, MasterKey};

/// Decrypt AES-CBC/PKCS#7 ciphertext → plaintext (in-memory)
pub fn decrypt_to_vec(
    ciphertext: &[u8],
    key: &MasterKey,
    iv: &InitVector,
) -> Result<KeyMaterial, CipherError> {
    check_aligned(ciphertext)?;

    let key = key.expose_secret().as_slice();
    let iv = iv.expose_secret().as_slice();

    let out = match key.len() {
        16 => decrypt_with::<Aes128>(key, iv, ciphertext)?,
        24 => decrypt_with::<Aes192>(key, iv, ciphertext)?,
        32 => decrypt_with::<Aes256>(key, iv, ciphertext)?,
        n => return Err(CipherError::InvalidKeyLength(n)),
    };
    Ok(KeyMaterial::new(out))
}

fn decrypt_with<C>(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    let decryptor = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    decryptor
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CipherError::BadPadding)
}
