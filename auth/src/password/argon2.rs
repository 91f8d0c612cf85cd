use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Memory cost in KiB (64 MiB).
pub const MEMORY_COST_KIB: u32 = 64 * 1024;
/// Number of passes over memory.
pub const ITERATIONS: u32 = 1;
/// Degree of parallelism (lanes).
pub const PARALLELISM: u32 = 4;
/// Derived key length in bytes.
pub const OUTPUT_LENGTH: usize = 32;

/// Well-formed hash under the current policy that no password matches in
/// practice. Verified against when a login names an unknown user so both
/// rejection paths pay for one key derivation.
pub const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=65536,t=1,p=4$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Argon2id password hasher with fixed cost parameters.
///
/// Produces PHC strings of the form
/// `$argon2id$v=19$m=65536,t=1,p=4$<salt>$<hash>` with unpadded base64
/// salt and hash. Verification reads every parameter back from the string,
/// so stored hashes stay verifiable regardless of the current policy.
///
/// Key derivation takes tens of milliseconds and 64 MiB. Async callers use
/// [`PasswordHasher::hash_async`] and [`PasswordHasher::check_async`], which
/// run it on tokio's blocking pool instead of a runtime worker.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a new password hasher with the policy cost parameters.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, Self::params()),
        }
    }

    fn params() -> Params {
        // Never fall back to argon2's defaults; the cost policy is fixed.
        Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, Some(OUTPUT_LENGTH))
            .expect("Argon2 cost constants must be within argon2's accepted ranges")
    }

    /// Hash a plaintext password with a fresh 16-byte random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string encoding algorithm, version, cost parameters, salt and hash
    ///
    /// # Errors
    /// * `HashingFailed` - Entropy source or key derivation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// [`PasswordHasher::hash`] on the blocking thread pool.
    ///
    /// # Errors
    /// * `HashingFailed` - Key derivation failed or the blocking task was lost
    pub async fn hash_async(&self, password: String) -> Result<String, PasswordError> {
        let hasher = self.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(format!("hashing task failed: {}", e)))?
    }

    /// Verify a password against a stored hash.
    ///
    /// A malformed stored hash is reported as `false`, the same as a wrong
    /// password. Use [`PasswordHasher::check`] to tell the two apart.
    pub fn verify(&self, password: &str, encoded: &str) -> bool {
        self.check(password, encoded).unwrap_or(false)
    }

    /// Verify a password against a stored hash, surfacing corrupt hashes.
    ///
    /// The derived key is recomputed with the salt and cost parameters parsed
    /// from `encoded` and compared in constant time.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash is not a parseable Argon2 PHC string
    pub fn check(&self, password: &str, encoded: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(encoded).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;

        if Algorithm::try_from(parsed_hash.algorithm).is_err() {
            return Err(PasswordError::MalformedHash(format!(
                "unsupported algorithm: {}",
                parsed_hash.algorithm
            )));
        }

        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::MalformedHash(e.to_string())),
        }
    }

    /// [`PasswordHasher::check`] on the blocking thread pool.
    ///
    /// # Errors
    /// * `MalformedHash` - Stored hash is not a parseable Argon2 PHC string
    /// * `HashingFailed` - The blocking task was lost
    pub async fn check_async(
        &self,
        password: String,
        encoded: String,
    ) -> Result<bool, PasswordError> {
        let hasher = self.clone();

        tokio::task::spawn_blocking(move || hasher.check(&password, &encoded))
            .await
            .map_err(|e| PasswordError::HashingFailed(format!("verification task failed: {}", e)))?
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
