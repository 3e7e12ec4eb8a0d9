use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;
use tokio::task;

use crate::error::AppError;

/// Hashes `password` with a fresh random salt on the blocking pool,
/// returning the PHC string.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    task::spawn_blocking(move || hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("hashing task failed: {}", e)))?
}

/// Checks `password` against a stored PHC string on the blocking pool.
pub async fn verify_password(password: String, stored_hash: String) -> Result<bool, AppError> {
    task::spawn_blocking(move || verify(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(format!("verification task failed: {}", e)))
}

fn hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// A malformed stored hash never matches.
fn verify(password: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
