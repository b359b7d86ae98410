//! Argon2id hashing. Both calls are CPU bound; callers on the async runtime
//! go through [`hash_blocking`] / [`verify_blocking`].

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tokio::task;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hash(argon2::password_hash::Error),

    #[error("stored password hash is malformed: {0}")]
    Malformed(argon2::password_hash::Error),

    #[error(transparent)]
    Join(#[from] task::JoinError),
}

pub fn hash(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(PasswordError::Hash)
}

pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(PasswordError::Malformed)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e)),
    }
}

pub async fn hash_blocking(password: String) -> Result<String, PasswordError> {
    task::spawn_blocking(move || hash(&password)).await?
}

pub async fn verify_blocking(password: String, hash: String) -> Result<bool, PasswordError> {
    task::spawn_blocking(move || verify(&password, &hash)).await?
}

/// A one-time password handed to an admin when they create an account.
pub fn temporary() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}
