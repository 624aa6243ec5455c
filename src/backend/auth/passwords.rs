//! Password hashing with bcrypt.

use crate::backend::error::BackendError;

/// bcrypt hasher with a configured work factor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password
    pub fn hash(&self, password: &str) -> Result<String, BackendError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Check a plaintext password against a stored hash
    ///
    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Stored password hash could not be verified");
            false
        })
    }
}
