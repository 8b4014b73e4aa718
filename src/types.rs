use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct PoolInitializationError(pub String);

/// Failure kinds surfaced by the persistence actor. Every domain validation
/// collapses into `Invalid` with a human-readable message; `Db` carries
/// store-level failures untouched so `?` works inside diesel transactions.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Db(#[from] diesel::result::Error),
}

impl ServiceError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ServiceError::Invalid(msg.into())
    }
}
