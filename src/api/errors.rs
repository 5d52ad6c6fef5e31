use thiserror::Error;

/// Coarse classification used by the services to pick a recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The request never produced a usable response.
    Network,
    /// The catalog API refused the request.
    Validation,
    /// The addressed product or coupon does not exist.
    NotFound,
}

/// Failure of a catalog API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("catalog API unreachable: {0}")]
    Network(String),
    #[error("catalog API rejected the request (status {status})")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("resource not found")]
    NotFound { message: Option<String> },
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Map a non-success HTTP status and the decoded body message.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            404 => ApiError::NotFound { message },
            _ => ApiError::Rejected { status, message },
        }
    }

    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Network(_) => ApiErrorKind::Network,
            ApiError::Rejected { .. } => ApiErrorKind::Validation,
            ApiError::NotFound { .. } => ApiErrorKind::NotFound,
        }
    }

    /// Message supplied by the catalog API in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Network(_) => None,
            ApiError::Rejected { message, .. } | ApiError::NotFound { message } => {
                message.as_deref()
            }
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        ApiError::Network(value.to_string())
    }
}
