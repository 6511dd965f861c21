//! Password hashing with Argon2id
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`),
//! so verification always uses the salt and cost recorded in the hash itself,
//! whatever the current [`HashParams`] are.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Argon2 cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    /// Memory cost in KiB
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    /// Number of passes
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Degree of parallelism
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

fn default_memory_kib() -> u32 {
    Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    Params::DEFAULT_P_COST
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

/// Hashes and verifies passwords
///
/// Argon2 is deliberately slow, so the async variants move the work onto
/// tokio's blocking pool instead of stalling a runtime worker.
#[derive(Clone)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new(params: HashParams) -> Result<Self, AuthError> {
        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Check a password against a stored PHC hash
    ///
    /// Returns `Ok(false)` on mismatch; errors only for unparseable hashes.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswordHash(e.to_string())),
        }
    }

    /// [`hash`](Self::hash) on the blocking pool
    pub async fn hash_async(&self, password: String) -> Result<String, AuthError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Hashing task failed: {}", e)))?
    }

    /// [`verify`](Self::verify) on the blocking pool
    pub async fn verify_async(&self, password: String, hash: String) -> Result<bool, AuthError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Verification task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordService {
        PasswordService::new(HashParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let service = cheap();
        let hash = service.hash("secret123").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret123"));
        assert!(service.verify("secret123", &hash).unwrap());
        assert!(!service.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_salt_is_fresh_per_hash() {
        let service = cheap();
        let a = service.hash("secret123").unwrap();
        let b = service.hash("secret123").unwrap();

        assert_ne!(a, b);
        assert!(service.verify("secret123", &a).unwrap());
        assert!(service.verify("secret123", &b).unwrap());
    }

    #[test]
    fn test_verify_uses_params_from_hash() {
        let hash = cheap().hash("secret123").unwrap();
        let stronger = PasswordService::new(HashParams {
            memory_kib: 2048,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();

        assert!(stronger.verify("secret123", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = cheap().verify("secret123", "secret123");
        assert!(matches!(result, Err(AuthError::PasswordHash(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordService::new(HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_default_params() {
        let params = HashParams::default();
        assert_eq!(params.memory_kib, 19456);
        assert_eq!(params.iterations, 2);
        assert_eq!(params.parallelism, 1);
    }

    #[tokio::test]
    async fn test_async_variants() {
        let service = cheap();
        let hash = service.hash_async("secret123".to_string()).await.unwrap();

        assert!(service
            .verify_async("secret123".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!service
            .verify_async("nope".to_string(), hash)
            .await
            .unwrap());
    }
}
