use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Delivery failed: {0}")]
    Delivery(String),
    #[error("Internal error: {0}")]
    Internal(String),
}
