//! Process-wide key material.
//!
//! Both keys are validated once, when the server starts. After that they are
//! read-only and shared behind an `Arc`; a misconfigured key never reaches a
//! request handler.

use base64ct::{Base64, Encoding};
use secrecy::{ExposeSecret, SecretBox, SecretSlice, SecretString};
use thiserror::Error;

pub const CIPHER_KEY_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("signing key must not be empty")]
    EmptySigningKey,
    #[error("cipher key is not valid base64")]
    CipherKeyEncoding,
    #[error("decoded cipher key length is not 32 bytes, key length: {0}")]
    CipherKeyLength(usize),
}

/// HMAC key used to sign and verify identity tokens.
pub struct SigningKey(SecretSlice<u8>);

impl SigningKey {
    /// # Errors
    /// Returns [`KeyError::EmptySigningKey`] for an empty secret.
    pub fn new(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.is_empty() {
            return Err(KeyError::EmptySigningKey);
        }

        Ok(Self(SecretSlice::from(secret.to_vec())))
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

/// AES-256 key used for pass tokens. Always exactly 32 bytes.
pub struct CipherKey(SecretBox<[u8; CIPHER_KEY_LEN]>);

impl CipherKey {
    #[must_use]
    pub fn new(bytes: [u8; CIPHER_KEY_LEN]) -> Self {
        Self(SecretBox::new(Box::new(bytes)))
    }

    /// Decode a standard (padded) base64 key.
    ///
    /// # Errors
    /// Returns an error if the value is not base64 or does not decode to 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, KeyError> {
        let decoded =
            Base64::decode_vec(encoded.trim()).map_err(|_| KeyError::CipherKeyEncoding)?;

        let bytes: [u8; CIPHER_KEY_LEN] = decoded
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::CipherKeyLength(decoded.len()))?;

        Ok(Self::new(bytes))
    }

    pub(crate) fn bytes(&self) -> &[u8; CIPHER_KEY_LEN] {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey([REDACTED])")
    }
}

/// Both keys, loaded together at startup.
#[derive(Debug)]
pub struct Keys {
    pub signing: SigningKey,
    pub cipher: CipherKey,
}

impl Keys {
    /// Validate the raw configuration secrets.
    ///
    /// # Errors
    /// Returns an error if either key violates its invariant.
    pub fn load(jwt_secret: &SecretString, aes_key: &SecretString) -> Result<Self, KeyError> {
        Ok(Self {
            signing: SigningKey::new(jwt_secret.expose_secret().as_bytes())?,
            cipher: CipherKey::from_base64(aes_key.expose_secret())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(len: usize) -> String {
        Base64::encode_string(&vec![7u8; len])
    }

    #[test]
    fn cipher_key_accepts_32_bytes() {
        let key = CipherKey::from_base64(&encoded(32));
        assert!(key.is_ok());
        assert_eq!(key.map(|k| *k.bytes()).ok(), Some([7u8; 32]));
    }

    #[test]
    fn cipher_key_rejects_wrong_length() {
        assert_eq!(
            CipherKey::from_base64(&encoded(31)).err(),
            Some(KeyError::CipherKeyLength(31))
        );
        assert_eq!(
            CipherKey::from_base64(&encoded(33)).err(),
            Some(KeyError::CipherKeyLength(33))
        );
    }

    #[test]
    fn cipher_key_rejects_invalid_base64() {
        assert_eq!(
            CipherKey::from_base64("not base64!").err(),
            Some(KeyError::CipherKeyEncoding)
        );
    }

    #[test]
    fn signing_key_rejects_empty() {
        assert_eq!(SigningKey::new(b"").err(), Some(KeyError::EmptySigningKey));
    }

    #[test]
    fn load_fails_on_short_cipher_key() {
        let secret = SecretString::from("testkey".to_string());
        let aes = SecretString::from(encoded(31));
        assert_eq!(
            Keys::load(&secret, &aes).err(),
            Some(KeyError::CipherKeyLength(31))
        );
    }

    #[test]
    fn debug_does_not_leak() {
        let key = SigningKey::new(b"super-secret").map(|k| format!("{k:?}"));
        assert_eq!(key.as_deref(), Ok("SigningKey([REDACTED])"));
    }
}
