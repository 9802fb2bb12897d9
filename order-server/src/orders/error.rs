use shared::ParseEnumError;
use shared::models::OrderStatus;
use thiserror::Error;

use crate::auth::PermissionDenied;
use crate::db::repository::RepoError;
use crate::utils::AppError;
use crate::utils::money::MoneyError;

/// Order ledger errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("PIN not found or not active")]
    PinNotActive,

    #[error("Order {0} not found")]
    NotFound(String),

    #[error("Invalid order request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Cannot move order from {from} to {to}")]
    TransitionRejected { from: OrderStatus, to: OrderStatus },

    #[error(transparent)]
    Forbidden(#[from] PermissionDenied),

    #[error(transparent)]
    InvalidInput(#[from] ParseEnumError),

    /// A stored price or total that cannot be priced
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::PinNotActive | OrderError::NotFound(_) => AppError::NotFound(err.to_string()),
            OrderError::InvalidRequest(_) | OrderError::TransitionRejected { .. } => {
                AppError::Validation(err.to_string())
            }
            OrderError::Money(_) => AppError::internal(err.to_string()),
            OrderError::Forbidden(e) => e.into(),
            OrderError::InvalidInput(e) => e.into(),
            OrderError::Repo(e) => e.into(),
        }
    }
}
