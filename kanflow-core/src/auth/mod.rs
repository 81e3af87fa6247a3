/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: opaque bearer token generation and SHA-256 hashing
///
/// Identity resolution (token → user) lives in [`crate::ops::identity`];
/// these modules are the pure crypto layer underneath it.

pub mod password;
pub mod token;
