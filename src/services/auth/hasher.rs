//! One-way salted hashing of user secrets (Argon2id, PHC string format).
//!
//! Each call to [`SecretHasher::hash`] draws a fresh 16-byte salt, so hashing
//! the same plaintext twice yields two different strings. Verification reads
//! the algorithm, cost parameters and salt back out of the stored string, so
//! hashes written under older parameters keep verifying after a config change.

#[cfg(test)]
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use thiserror::Error;

const SALT_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("invalid hash parameters: {0}")]
    Params(argon2::Error),

    #[error("salt generation failed")]
    Salt,

    #[error("malformed stored hash: {0}")]
    Malformed(password_hash::Error),

    #[error("hashing failed: {0}")]
    Hash(password_hash::Error),

    #[error("hashing task failed")]
    Join(#[from] tokio::task::JoinError),
}

/// Memory / time / lane cost of a single hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

#[derive(Clone)]
pub struct SecretHasher {
    params: Params,
    // clone 間で共有される verify 回数 (test のみ)
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

impl std::fmt::Debug for SecretHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretHasher")
            .field("m_cost", &self.params.m_cost())
            .field("t_cost", &self.params.t_cost())
            .field("p_cost", &self.params.p_cost())
            .finish()
    }
}

impl SecretHasher {
    pub fn new(cost: HashCost) -> Result<Self, HashError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(HashError::Params)?;
        Ok(Self {
            params,
            #[cfg(test)]
            verifications: Arc::default(),
        })
    }

    #[cfg(test)]
    pub(crate) fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `plaintext` with a freshly generated salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        getrandom::fill(&mut salt_bytes).map_err(|_| HashError::Salt)?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(HashError::Hash)?;

        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(HashError::Hash)
    }

    /// `Ok(false)` on a wrong secret; `Err` only when `hashed` cannot be parsed.
    pub fn verify(&self, plaintext: &str, hashed: &str) -> Result<bool, HashError> {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::SeqCst);

        let parsed = PasswordHash::new(hashed).map_err(HashError::Malformed)?;

        match self.argon2().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Malformed(e)),
        }
    }

    /// [`hash`](Self::hash) on the blocking pool.
    pub async fn hash_blocking(&self, plaintext: String) -> Result<String, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext)).await?
    }

    /// [`verify`](Self::verify) on the blocking pool.
    pub async fn verify_blocking(
        &self,
        plaintext: String,
        hashed: String,
    ) -> Result<bool, HashError> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hashed)).await?
    }
}

#[cfg(test)]
pub(crate) fn test_hasher() -> SecretHasher {
    // Minimum Argon2 cost keeps the test suite fast.
    SecretHasher::new(HashCost {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    })
    .unwrap()
}
