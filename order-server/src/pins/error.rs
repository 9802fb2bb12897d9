use shared::ParseEnumError;
use thiserror::Error;

use crate::auth::PermissionDenied;
use crate::db::repository::RepoError;
use crate::utils::AppError;

/// PIN session errors
#[derive(Debug, Error)]
pub enum PinError {
    #[error("Dining table {0} not found")]
    TableNotFound(String),

    /// Unknown, expired and closed codes all look the same to callers
    #[error("PIN not found or not active")]
    NotActive,

    #[error("Session {0} not found")]
    SessionNotFound(String),

    #[error("Could not generate a unique PIN after {0} attempts")]
    ExhaustedRetries(u32),

    #[error(transparent)]
    Forbidden(#[from] PermissionDenied),

    #[error(transparent)]
    InvalidInput(#[from] ParseEnumError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<PinError> for AppError {
    fn from(err: PinError) -> Self {
        match err {
            PinError::TableNotFound(_) | PinError::NotActive | PinError::SessionNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            PinError::ExhaustedRetries(_) => AppError::ExhaustedRetries(err.to_string()),
            PinError::Forbidden(e) => e.into(),
            PinError::InvalidInput(e) => e.into(),
            PinError::Repo(e) => e.into(),
        }
    }
}
