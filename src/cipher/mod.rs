//! Opaque pass tokens for share links.
//!
//! A pass token is `base64url(IV || ciphertext)` where the IV is 16 fresh random
//! bytes and the cipher is AES-256 in CFB mode. There is no authentication
//! tag: a tampered token decrypts to garbage instead of failing, so callers
//! must check that the plaintext is plausible before trusting it.

use crate::keys::CipherKey;
use aes::Aes256;
use base64ct::{Base64Url, Encoding};
use cfb_mode::cipher::{generic_array::GenericArray, AsyncStreamCipher, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;

type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

pub const IV_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Caller input that cannot be a pass token.
    #[error("malformed pass token: {0}")]
    Malformed(&'static str),
    #[error("failed to generate IV")]
    Rng,
}

/// Encrypt `plaintext` under a fresh IV.
///
/// # Errors
/// Returns [`CipherError::Rng`] if the OS random source fails.
pub fn encrypt(plaintext: &str, key: &CipherKey) -> Result<String, CipherError> {
    let mut buf = vec![0u8; IV_LEN + plaintext.len()];
    let (iv, body) = buf.split_at_mut(IV_LEN);

    OsRng.try_fill_bytes(iv).map_err(|_| CipherError::Rng)?;
    body.copy_from_slice(plaintext.as_bytes());

    Aes256CfbEnc::new(
        GenericArray::from_slice(key.bytes().as_slice()),
        GenericArray::from_slice(iv),
    )
    .encrypt(body);

    Ok(Base64Url::encode_string(&buf))
}

/// Decrypt a pass token.
///
/// Invalid UTF-8 in the decrypted bytes is replaced, never reported: only
/// undecodable or truncated input is an error.
///
/// # Errors
/// Returns [`CipherError::Malformed`] for undecodable or truncated input.
pub fn decrypt(token: &str, key: &CipherKey) -> Result<String, CipherError> {
    let mut data =
        Base64Url::decode_vec(token).map_err(|_| CipherError::Malformed("not base64url"))?;
    if data.len() < IV_LEN {
        return Err(CipherError::Malformed("shorter than the IV"));
    }

    let (iv, body) = data.split_at_mut(IV_LEN);

    Aes256CfbDec::new(
        GenericArray::from_slice(key.bytes().as_slice()),
        GenericArray::from_slice(iv),
    )
    .decrypt(body);

    Ok(String::from_utf8_lossy(body).into_owned())
}
