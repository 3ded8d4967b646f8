//! CSRF token generation.

use anyhow::{Context, Result};
use base64ct::{Base64, Encoding};
use rand::{rngs::OsRng, RngCore};

pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

const CSRF_TOKEN_BYTES: usize = 32;

/// Create a CSRF token: 32 random bytes, standard padded base64 (44 chars).
///
/// # Errors
/// Returns an error only if the OS random source fails.
pub fn generate() -> Result<String> {
    let mut bytes = [0u8; CSRF_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate CSRF token")?;
    Ok(Base64::encode_string(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn token_is_44_chars_of_32_bytes() -> Result<()> {
        let token = generate()?;
        assert_eq!(token.len(), 44);

        let decoded = Base64::decode_vec(&token).map_err(|e| anyhow::anyhow!("{e}"))?;
        assert_eq!(decoded.len(), CSRF_TOKEN_BYTES);
        Ok(())
    }

    #[test]
    fn tokens_do_not_repeat() -> Result<()> {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(generate()?));
        }
        Ok(())
    }
}
