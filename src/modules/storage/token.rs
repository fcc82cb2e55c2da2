//! Unguessable identifiers for uploads and sessions.
//!
//! Bytes come from the operating system CSPRNG. If it fails the caller gets
//! an error; there is no fallback to a weaker generator.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("entropy source unavailable: {0}")]
pub struct TokenError(String);

fn random_bytes(byte_length: usize) -> Result<Vec<u8>, TokenError> {
    let mut buf = vec![0u8; byte_length];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| TokenError(e.to_string()))?;
    Ok(buf)
}

/// `byte_length` random bytes, hex encoded (safe in URL paths and filenames)
pub fn generate_hex_token(byte_length: usize) -> Result<String, TokenError> {
    Ok(hex::encode(random_bytes(byte_length)?))
}

/// `byte_length` random bytes, unpadded base64url (safe in cookie values)
pub fn generate_url_safe_token(byte_length: usize) -> Result<String, TokenError> {
    Ok(URL_SAFE_NO_PAD.encode(random_bytes(byte_length)?))
}
