use shared::ParseEnumError;
use thiserror::Error;

use crate::auth::PermissionDenied;
use crate::db::repository::RepoError;
use crate::utils::AppError;
use crate::utils::money::MoneyError;

/// Checkout errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("PIN not found or not active")]
    SessionNotActive,

    #[error("No completed orders to check out")]
    NoCompletedOrders,

    #[error("Checkout {0} not found")]
    NotFound(String),

    /// Lost a race with another finalize or an order status change
    #[error("{0}")]
    Conflict(String),

    #[error("Receipt total {computed} does not match order total")]
    TotalMismatch { computed: f64 },

    #[error("{0}")]
    InvalidQuery(String),

    #[error(transparent)]
    Forbidden(#[from] PermissionDenied),

    #[error(transparent)]
    InvalidInput(#[from] ParseEnumError),

    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::SessionNotActive | CheckoutError::NotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            CheckoutError::NoCompletedOrders => AppError::NoCompletedOrders,
            CheckoutError::Conflict(msg) => AppError::Conflict(msg),
            CheckoutError::TotalMismatch { .. } | CheckoutError::Money(_) => {
                AppError::internal(err.to_string())
            }
            CheckoutError::InvalidQuery(msg) => AppError::Validation(msg),
            CheckoutError::Forbidden(e) => e.into(),
            CheckoutError::InvalidInput(e) => e.into(),
            CheckoutError::Repo(e) => e.into(),
        }
    }
}
