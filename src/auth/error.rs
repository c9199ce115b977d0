//! Token lifecycle errors
//!
//! Rotation rejections keep their precise [`RejectReason`] for logging, but
//! every one of them is the same `Unauthorized` outcome to the caller.

use thiserror::Error;

use super::hasher::HashError;
use super::jwt::JwtError;
use super::secret::EntropyError;
use crate::store::StoreError;

/// Why a rotation was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("invalid access token: {0}")]
    InvalidAccessToken(JwtError),

    #[error("refresh token not found")]
    NotFound,

    #[error("refresh token already used")]
    AlreadyUsed,

    #[error("refresh token expired")]
    RefreshExpired,

    #[error("invalid refresh token")]
    SecretMismatch,
}

/// Errors from issuing or rotating token pairs
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Unauthorized: {0}")]
    Unauthorized(RejectReason),

    #[error(transparent)]
    Entropy(#[from] EntropyError),

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),

    #[error("Access token signing failed: {0}")]
    Signing(JwtError),

    #[error(transparent)]
    Hashing(#[from] HashError),

    #[error("Blocking task failed: {0}")]
    Task(String),
}

impl TokenError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, TokenError::Unauthorized(_))
    }
}

impl From<RejectReason> for TokenError {
    fn from(reason: RejectReason) -> Self {
        TokenError::Unauthorized(reason)
    }
}

impl From<tokio::task::JoinError> for TokenError {
    fn from(err: tokio::task::JoinError) -> Self {
        TokenError::Task(err.to_string())
    }
}
