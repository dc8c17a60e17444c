//! Salted, adaptive one-way password hashing.
//!
//! Hashes are Argon2id PHC strings, so the salt and cost parameters travel
//! with the hash and verification needs nothing else.

use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;

use crate::config::SecurityConfig;

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    pub fn new(config: &SecurityConfig) -> Result<Self> {
        let params = Params::new(
            config.argon2_memory_cost_kib,
            config.argon2_time_cost,
            config.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash_blocking(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

        Ok(hash.to_string())
    }

    /// Any parse failure of `hash` counts as a mismatch.
    #[must_use]
    pub fn verify_blocking(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        // Params come from the PHC string, not from self
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// Argon2 is CPU-bound, so hashing runs on the blocking pool.
    pub async fn hash(&self, plaintext: &str) -> Result<String> {
        let hasher = self.clone();
        let plaintext = plaintext.to_string();
        task::spawn_blocking(move || hasher.hash_blocking(&plaintext))
            .await
            .context("Password hashing task panicked")?
    }

    pub async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool> {
        let hasher = self.clone();
        let plaintext = plaintext.to_string();
        let hash = hash.to_string();
        task::spawn_blocking(move || hasher.verify_blocking(&plaintext, &hash))
            .await
            .context("Password verification task panicked")
    }

    /// Whether `hash` is a well-formed PHC string.
    #[must_use]
    pub fn is_well_formed(hash: &str) -> bool {
        PasswordHash::new(hash).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            ..SecurityConfig::default()
        };
        PasswordHasher::new(&config).unwrap()
    }

    #[test]
    fn test_verify_accepts_original_plaintext() {
        let hasher = fast_hasher();
        let hash = hasher.hash_blocking("admin123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_blocking("admin123", &hash));
    }

    #[test]
    fn test_single_character_change_fails() {
        let hasher = fast_hasher();
        let hash = hasher.hash_blocking("correct horse").unwrap();

        assert!(!hasher.verify_blocking("correct horsf", &hash));
        assert!(!hasher.verify_blocking("Correct horse", &hash));
        assert!(!hasher.verify_blocking("correct hors", &hash));
        assert!(!hasher.verify_blocking("", &hash));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let hasher = fast_hasher();
        let a = hasher.hash_blocking("same").unwrap();
        let b = hasher.hash_blocking("same").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify_blocking("same", &a));
        assert!(hasher.verify_blocking("same", &b));
    }

    #[test]
    fn test_malformed_hash_is_a_mismatch() {
        let hasher = fast_hasher();

        assert!(!hasher.verify_blocking("anything", ""));
        assert!(!hasher.verify_blocking("anything", "not-a-phc-string"));
        assert!(!hasher.verify_blocking(
            "anything",
            "$2a$10$abcdefghijklmnopqrstuuABCDEFGHIJKLMNOPQRSTUVWXYZ01234"
        ));
        assert!(!PasswordHasher::is_well_formed("plain"));
    }

    #[tokio::test]
    async fn test_async_round_trip() {
        let hasher = fast_hasher();
        let hash = hasher.hash("abcdef").await.unwrap();

        assert!(hasher.verify("abcdef", &hash).await.unwrap());
        assert!(!hasher.verify("abcdeg", &hash).await.unwrap());
    }
}
