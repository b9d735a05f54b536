use crate::types::EpochMs;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EconError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Already owned")]
    AlreadyOwned,

    #[error("{0} already active")]
    AlreadyActive(&'static str),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Cooldown active: {remaining_ms} ms remaining")]
    CooldownActive { remaining_ms: EpochMs },

    #[error("Another command for this user is still in progress")]
    Busy,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EconResult<T> = Result<T, EconError>;

impl EconError {
    /// Convenience for validation failures.
    pub fn invalid(msg: impl Into<String>) -> Self {
        EconError::Validation(msg.into())
    }
}
