//! Credential handling for Chirpy: argon2 password hashing and the
//! stateless JWT session tokens. Tokens are never stored server-side;
//! a token that validates and has not expired is always accepted.

pub mod password;
pub mod token;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token is expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("failed to hash password: {0}")]
    Hashing(String),

    #[error("invalid email or password")]
    InvalidCredentials,
}
