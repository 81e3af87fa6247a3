/// Password hashing using Argon2id
///
/// Passwords are stored as Argon2id PHC strings, never in plaintext. The
/// parameters (64 MB memory, 3 iterations, 4 lanes) follow current OWASP
/// guidance; verification is constant-time.
///
/// # Example
///
/// ```
/// use kanflow_core::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("super_secret_password_123")?;
/// assert!(verify_password("super_secret_password_123", &hash)?);
/// assert!(!verify_password("wrong_password", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password using Argon2id
///
/// Returns a PHC string containing algorithm, parameters, salt and hash,
/// e.g. `$argon2id$v=19$m=65536,t=3,p=4$...`.
///
/// # Errors
///
/// Returns `PasswordError::HashError` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536) // 64 MB
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Verifies a password against a stored hash
///
/// # Returns
///
/// `Ok(true)` if the password matches, `Ok(false)` if it does not.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the stored hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    // Parameters are embedded in the hash
    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!(
            "Verification failed: {}",
            e
        ))),
    }
}
