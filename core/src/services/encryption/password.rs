//! Password hashing with bcrypt.

use kurator_shared::validation::validators;

use crate::errors::{DomainError, DomainResult, ValidationError};

const MIN_COST: u32 = 4;
const MAX_COST: u32 = 31;
const MIN_LENGTH: usize = 8;
// bcrypt ignores input beyond 72 bytes
const MAX_BYTES: usize = 72;

#[derive(Debug, Clone)]
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
        Self {
            cost: cost.clamp(MIN_COST, MAX_COST),
        }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// At least 8 characters with a letter and a digit
    pub fn validate_policy(password: &str) -> Result<(), ValidationError> {
        if password.len() > MAX_BYTES {
            return Err(ValidationError::InvalidLength {
                field: "password".to_string(),
                min: MIN_LENGTH,
                max: MAX_BYTES,
            });
        }
        if !validators::is_strong_password(password) {
            return Err(ValidationError::BusinessRuleViolation {
                rule: "password must be at least 8 characters and contain a letter and a digit"
                    .to_string(),
            });
        }
        Ok(())
    }

    /// Check the policy, then hash
    pub fn hash(&self, password: &str) -> DomainResult<String> {
        Self::validate_policy(password)?;
        bcrypt::hash(password, self.cost).map_err(|e| DomainError::Internal {
            message: format!("Password hashing failed: {}", e),
        })
    }

    /// A malformed stored hash verifies as false
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}
