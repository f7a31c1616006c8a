// ABOUTME: Opaque security token generation backed by the system CSPRNG
// ABOUTME: Provides hex-encoded random tokens and SHA-256 digests for at-rest storage
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Groomdesk.io

use crate::constants::limits::SECURITY_TOKEN_BYTES;
use crate::errors::{AppError, AppResult};
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

/// Generate a cryptographically random opaque token.
///
/// Produces [`SECURITY_TOKEN_BYTES`] bytes (256 bits) of entropy, hex-encoded.
/// Used for invitation tokens and refresh tokens; uniqueness is enforced by
/// database constraints, collisions at this entropy are not a practical concern.
///
/// # Errors
///
/// Returns an error if the system RNG fails. The server cannot operate
/// securely without a working RNG, so callers treat this as fatal.
pub fn generate_security_token() -> AppResult<String> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; SECURITY_TOKEN_BYTES];

    rng.fill(&mut bytes).map_err(|e| {
        tracing::error!("CRITICAL: system RNG failure while generating security token: {e}");
        AppError::internal("System RNG failure - cannot generate secure token")
    })?;

    Ok(hex::encode(bytes))
}

/// SHA-256 digest of a token, hex-encoded.
///
/// Refresh tokens are stored as digests; the opaque value never touches disk.
#[must_use]
pub fn sha256_hex(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length_and_uniqueness() {
        let a = generate_security_token().unwrap();
        let b = generate_security_token().unwrap();
        assert_eq!(a.len(), SECURITY_TOKEN_BYTES * 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sha256_hex_is_stable() {
        let digest = sha256_hex("token-123");
        assert_eq!(digest, sha256_hex("token-123"));
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, sha256_hex("token-124"));
    }
}
