/// Password hashing and verification
///
/// Backed by bcrypt with the default cost factor (12). Hashing is a
/// deliberately slow CPU operation; callers should not hold other resources
/// across these calls.

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::AppError;

/// Hash a password with a fresh salt.
///
/// # Errors
/// Returns error if bcrypt rejects the input (e.g., length/cost limits)
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash.
///
/// A wrong password is a non-fatal `Ok(false)`; a malformed stored hash is
/// an error in its own right.
pub fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    verify(password, hashed)
        .map_err(|e| AppError::Internal(format!("Stored password hash rejected: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_password() {
        let password = "SecurePass123";
        let hashed = hash_password(password).expect("Failed to hash password");

        assert_ne!(password, hashed);
        assert!(hashed.starts_with("$2"));
    }

    #[test]
    fn correct_password_verifies() {
        let password = "SecurePass123";
        let hashed = hash_password(password).expect("Failed to hash password");

        assert!(verify_password(password, &hashed).expect("Failed to verify"));
    }

    #[test]
    fn wrong_password_is_a_mismatch_not_an_error() {
        let hashed = hash_password("SecurePass123").expect("Failed to hash password");

        assert!(!verify_password("WrongPass123", &hashed).expect("Failed to verify"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("whatever", "not-a-bcrypt-hash").is_err());
    }
}
