use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

const DECOY_CREDENTIAL: &str = "decoy-credential";

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl HashingParams {
    pub const MIN_MEMORY_KIB: u32 = 19_456;
    pub const MIN_ITERATIONS: u32 = 2;

    /// Check the parameters against the minimum accepted cost.
    ///
    /// # Errors
    /// * `InvalidParams` - Memory or time cost is below the floor, or parallelism is zero
    pub fn validate(&self) -> Result<(), PasswordError> {
        if self.memory_kib < Self::MIN_MEMORY_KIB {
            return Err(PasswordError::InvalidParams(format!(
                "memory cost must be at least {} KiB, got {}",
                Self::MIN_MEMORY_KIB,
                self.memory_kib
            )));
        }
        if self.iterations < Self::MIN_ITERATIONS {
            return Err(PasswordError::InvalidParams(format!(
                "time cost must be at least {}, got {}",
                Self::MIN_ITERATIONS,
                self.iterations
            )));
        }
        if self.parallelism == 0 {
            return Err(PasswordError::InvalidParams(
                "parallelism must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: Self::MIN_MEMORY_KIB,
            iterations: Self::MIN_ITERATIONS,
            parallelism: 1,
        }
    }
}

/// Password hashing implementation.
///
/// One-way, salted Argon2id hashing. The same hasher protects refresh tokens
/// at rest, which are treated as secrets just like passwords.
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    decoy: String,
}

impl PasswordHasher {
    /// Create a hasher with the minimum accepted cost (m=19456 KiB, t=2, p=1).
    ///
    /// # Errors
    /// * `HashingFailed` - The decoy digest could not be computed
    pub fn new() -> Result<Self, PasswordError> {
        Self::with_params(HashingParams::default())
    }

    /// Create a hasher with explicit cost parameters.
    ///
    /// The decoy digest used by `verify_decoy` is computed here, at the same
    /// cost as real hashes.
    ///
    /// # Errors
    /// * `InvalidParams` - Parameters are weaker than the floor or rejected by argon2
    /// * `HashingFailed` - The decoy digest could not be computed
    pub fn with_params(params: HashingParams) -> Result<Self, PasswordError> {
        params.validate()?;

        let params = Params::new(
            params.memory_kib,
            params.iterations,
            params.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;

        let mut hasher = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            decoy: String::new(),
        };
        hasher.decoy = hasher.hash(DECOY_CREDENTIAL)?;

        Ok(hasher)
    }

    /// Hash a plaintext secret.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext secret against a stored hash.
    ///
    /// A malformed digest or an algorithm mismatch counts as a mismatch; the
    /// caller cannot tell a broken hash apart from a wrong password.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!(error = %e, "Stored hash could not be parsed");
                return false;
            }
        };

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => true,
            Err(PasswordHashError::Password) => false,
            Err(e) => {
                tracing::debug!(error = %e, "Hash verification failed internally");
                false
            }
        }
    }

    /// Spend one verification against a throwaway digest.
    ///
    /// Used when there is no stored hash to check (unknown account) so the
    /// rejection costs the same as a wrong password. Always returns false.
    pub fn verify_decoy(&self, password: &str) -> bool {
        let _ = self.verify(password, &self.decoy);
        false
    }
}
