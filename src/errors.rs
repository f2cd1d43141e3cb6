//! Error types shared by the stores and services. The `Display` text of every
//! [`ServiceError`] variant is exactly what the UI shows in its footer, so the
//! messages are written for the person at the keyboard.

use thiserror::Error;

/// Failures raised by a [`crate::store::Store`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Failures raised by the domain services.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        ServiceError::Authorization(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        ServiceError::Conflict(message.into())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
pub type StoreResult<T> = Result<T, StoreError>;
