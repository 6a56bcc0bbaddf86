use argon2::password_hash::{self, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use std::sync::Arc;
#[cfg(test)]
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ServiceError;

/// argon2id work factor.
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

impl HashCost {
    /// Smallest cost argon2 accepts. Only suitable for tests.
    pub const fn minimal() -> Self {
        Self { memory_kib: Params::MIN_M_COST, iterations: Params::MIN_T_COST, parallelism: Params::MIN_P_COST }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self { memory_kib: cfg.hash_memory_kib, iterations: cfg.hash_iterations, parallelism: cfg.hash_parallelism }
    }
}

/// Salted one-way password hashing with argon2id.
///
/// Hashes are stored as PHC strings, so verification reads the cost from the
/// stored value and keeps working after the configured cost changes.
///
/// A throwaway hash computed at the configured cost is kept so that lookups
/// of unknown accounts can spend the same work as a real verification.
#[derive(Clone)]
pub struct PasswordHasher {
    params: Params,
    dummy_phc: Arc<str>,
    #[cfg(test)]
    verifications: Arc<AtomicUsize>,
}

impl PasswordHasher {
    pub fn new(cost: HashCost) -> Result<Self, ServiceError> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
            .map_err(|e| ServiceError::internal(format!("invalid hash cost: {e}")))?;
        let mut hasher = Self {
            params,
            dummy_phc: Arc::from(""),
            #[cfg(test)]
            verifications: Arc::default(),
        };
        hasher.dummy_phc = Arc::from(hasher.hash("unused-account-password")?);
        Ok(hasher)
    }

    /// PHC string of a password no account has. Verifying against it costs
    /// as much as a real check and always fails.
    pub fn dummy_hash(&self) -> &str { &self.dummy_phc }

    #[cfg(test)]
    pub(crate) fn verifications(&self) -> usize { self.verifications.load(Ordering::SeqCst) }

    fn argon(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    pub fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::internal(format!("hashing error: {e}")))?;
        Ok(hash.to_string())
    }

    /// `Ok(false)` on mismatch. The digest comparison inside argon2 is
    /// constant time.
    pub fn verify(&self, password: &str, phc: &str) -> Result<bool, ServiceError> {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::SeqCst);
        let parsed = PasswordHash::new(phc).map_err(|e| ServiceError::internal(format!("stored hash unreadable: {e}")))?;
        match self.argon().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(ServiceError::internal(format!("hash verification error: {e}"))),
        }
    }
}
