// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Basislager Contributors

//! Password hashing and verification.
//!
//! Argon2id with a fixed work factor. The PHC output string embeds the
//! salt and parameters, so verification needs nothing besides the stored
//! hash itself. Hashing is deliberately slow; handlers run it on the
//! blocking pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};

/// Failure of the hashing primitive itself (malformed stored hash,
/// parameter error). A wrong password is NOT an error.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashingError(String);

/// Work factor for new hashes: 19 MiB memory, 2 iterations, 1 lane.
const MEMORY_KIB: u32 = 19 * 1024;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

/// Credential hasher with a fixed work factor.
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        // Params::new only fails on out-of-range values; these are constants.
        let params =
            Params::new(MEMORY_KIB, ITERATIONS, LANES, None).expect("valid argon2 parameters");
        Self { params }
    }
}

impl CredentialHasher {
    /// Hash a password. The returned PHC string embeds salt and work
    /// factor.
    pub fn hash(&self, password: &str) -> Result<String, HashingError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            self.params.clone(),
        );
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| HashingError(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch. Only a malformed stored hash is
    /// an error.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, HashingError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| HashingError(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashingError(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_succeeds() {
        let hasher = CredentialHasher::default();
        let hash = hasher.hash("hunter2").unwrap();
        assert!(hasher.verify("hunter2", &hash).unwrap());
    }

    #[test]
    fn wrong_password_is_false_not_error() {
        let hasher = CredentialHasher::default();
        let hash = hasher.hash("hunter2").unwrap();
        assert!(!hasher.verify("hunter3", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = CredentialHasher::default();
        let a = hasher.hash("hunter2").unwrap();
        let b = hasher.hash("hunter2").unwrap();
        assert_ne!(a, b);
        assert!(hasher.verify("hunter2", &a).unwrap());
        assert!(hasher.verify("hunter2", &b).unwrap());
    }

    #[test]
    fn output_embeds_algorithm_and_params() {
        let hasher = CredentialHasher::default();
        let hash = hasher.hash("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("m=19456"));
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let hasher = CredentialHasher::default();
        assert!(hasher.verify("hunter2", "not-a-phc-string").is_err());
    }
}
