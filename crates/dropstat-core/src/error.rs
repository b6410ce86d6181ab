//! Unified Error Model
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DropError {
    /// Request is well-formed but breaks a business rule
    #[error("BUSINESS/{0}")]
    BusinessRule(String),

    /// Malformed or out-of-range request fields
    #[error("VALIDATION/{0}")]
    Validation(String),

    /// Recall target absent or token mismatch; the two are not told apart
    #[error("NOT_FOUND/{0}")]
    NotFound(String),

    #[error("FORBIDDEN/{0}")]
    Forbidden(String),

    /// Recall past the window
    #[error("EXPIRED/{0}")]
    Expired(String),

    /// Downstream or internal fault
    #[error("SERVICE/{0}")]
    Service(String),

    #[error("UNKNOWN/{0}")]
    Unknown(String),
}

impl DropError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DropError::BusinessRule(_) => ErrorCode::BusinessException,
            DropError::Validation(_) => ErrorCode::InvalidParameter,
            DropError::NotFound(_) => ErrorCode::NotFound,
            DropError::Forbidden(_) => ErrorCode::Forbidden,
            DropError::Expired(_) => ErrorCode::Expired,
            DropError::Service(_) => ErrorCode::ServiceException,
            DropError::Unknown(_) => ErrorCode::Unknown,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DropError::BusinessRule(msg)
            | DropError::Validation(msg)
            | DropError::NotFound(msg)
            | DropError::Forbidden(msg)
            | DropError::Expired(msg)
            | DropError::Service(msg)
            | DropError::Unknown(msg) => msg,
        }
    }

    /// Whether the caller caused the failure (as opposed to the service)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, DropError::Service(_) | DropError::Unknown(_))
    }
}

/// Machine-readable error code carried in error responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    BusinessException,
    InvalidParameter,
    NotFound,
    Forbidden,
    Expired,
    ServiceException,
    Unknown,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BusinessException => "BUSINESS_EXCEPTION",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Expired => "EXPIRED",
            ErrorCode::ServiceException => "SERVICE_EXCEPTION",
            ErrorCode::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
