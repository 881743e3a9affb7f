// src/crypto/encrypt.rs
use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockCipher, BlockEncryptMut, KeyInit, KeyIvInit};

use super::CipherError;
use crate::aliases::{CypherText, InitVector, MasterKey};

/// Encrypt plaintext → AES-CBC/PKCS#7 ciphertext (in-memory)
///
/// The IV is used as given. Encrypting several plaintexts under the same
/// key/IV pair reveals which of them share leading blocks.
pub fn encrypt_to_vec(
    plaintext: &[u8],
    key: &MasterKey,
    iv: &InitVector,
) -> Result<CypherText, CipherError> {
    let key = key.expose_secret().as_slice();
    let iv = iv.expose_secret().as_slice();

    let out = match key.len() {
        16 => encrypt_with::<Aes128>(key, iv, plaintext)?,
        24 => encrypt_with::<Aes192>(key, iv, plaintext)?,
        32 => encrypt_with::<Aes256>(key, iv, plaintext)?,
        n => return Err(CipherError::InvalidKeyLength(n)),
    };
    Ok(CypherText::new(out))
}

fn encrypt_with<C>(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    let encryptor = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|_| CipherError::InvalidKeyLength(key.len()))?;
    Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}
