use crate::error::AppError;
use bcrypt::{hash, verify};

/// bcrypt only looks at the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hashes and verifies passwords with bcrypt at a fixed cost.
///
/// Passwords are cut to their first 72 UTF-8 bytes before hashing or
/// verification, so two passwords that only differ past that point are
/// interchangeable. Longer input is never rejected.
#[derive(Debug, Clone, Copy)]
pub struct CredentialManager {
    cost: u32,
}

impl CredentialManager {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Produces a salted digest of `password`.
    ///
    /// Only fails if bcrypt itself cannot run (invalid cost, no randomness).
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash(truncate_password(password), self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Checks `password` against `digest`. A malformed digest is a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        verify(truncate_password(password), digest).unwrap_or(false)
    }
}

/// The bytes of `password` that actually take part in hashing.
///
/// The cut is byte-based and may split a multi-byte character.
pub fn truncate_password(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)]
}
