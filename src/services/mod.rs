use thiserror::Error;

use crate::api::errors::{ApiError, ApiErrorKind};

pub mod discounts;
pub mod products;
pub mod session;

/// Last-resort text when neither the catalog API nor the transport gave one.
pub const UNKNOWN_ERROR: &str = "Unknown error.";

/// Failure surfaced to the form or modal that started an operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Input rejected before anything was sent.
    #[error("{0}")]
    Form(String),
    /// The catalog API call failed; `message` is ready for display.
    #[error("{message}")]
    Api { kind: ApiErrorKind, message: String },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Normalize `err`: server message, then the error text, then `fallback`.
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        let message = err
            .server_message()
            .map(str::to_string)
            .or_else(|| {
                let generic = err.to_string();
                (!generic.trim().is_empty()).then_some(generic)
            })
            .unwrap_or_else(|| fallback.to_string());

        ServiceError::Api {
            kind: err.kind(),
            message,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ServiceError::Form(message) | ServiceError::Api { message, .. } => message,
        }
    }

    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            ServiceError::Form(_) => None,
            ServiceError::Api { kind, .. } => Some(*kind),
        }
    }
}

impl From<ApiError> for ServiceError {
    fn from(value: ApiError) -> Self {
        ServiceError::from_api(&value, UNKNOWN_ERROR)
    }
}
