//! Authentication error types.

use innkeep_core::error::InnkeepError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session has expired")]
    SessionExpired,

    #[error("invalid session: {0}")]
    SessionInvalid(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for InnkeepError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::SessionExpired
            | AuthError::SessionInvalid(_) => InnkeepError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => InnkeepError::Crypto(msg),
        }
    }
}
