// src/error.rs
//! Service-boundary error type. Validation and not-found failures carry the
//! stable error code the HTTP layer puts on the wire.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{message}")]
    Validation {
        code: &'static str,
        message: String,
    },

    #[error("{entity} not found with id: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
