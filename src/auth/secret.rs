//! Random secret generation
//!
//! All randomness comes from the operating system CSPRNG. A failing entropy
//! source is an error for the caller; there is no weaker fallback.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha512};
use thiserror::Error;

/// Bytes of entropy behind a refresh-token secret
pub const REFRESH_SECRET_BYTES: usize = 32;

/// Bytes of entropy digested into an access-token id
pub const TOKEN_ID_BYTES: usize = 16;

#[derive(Error, Debug)]
#[error("Entropy source unavailable: {0}")]
pub struct EntropyError(#[from] rand::Error);

/// Fill `len` bytes from the OS random source
pub fn random_bytes(len: usize) -> Result<Vec<u8>, EntropyError> {
    let mut buf = vec![0u8; len];
    OsRng.try_fill_bytes(&mut buf)?;
    Ok(buf)
}

/// URL-safe base64 of `len` random bytes
pub fn random_token(len: usize) -> Result<String, EntropyError> {
    Ok(URL_SAFE_NO_PAD.encode(random_bytes(len)?))
}

/// Client-facing refresh secret: standard base64 of 32 random bytes
pub fn refresh_secret() -> Result<String, EntropyError> {
    Ok(STANDARD.encode(random_bytes(REFRESH_SECRET_BYTES)?))
}

/// Access-token id (`jti`): SHA-512 of fresh random bytes, URL-safe base64
pub fn token_id() -> Result<String, EntropyError> {
    let seed = random_bytes(TOKEN_ID_BYTES)?;
    let digest = Sha512::digest(&seed);
    Ok(URL_SAFE_NO_PAD.encode(digest))
}
