use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Credential has expired")]
    ExpiredCredential,

    #[error("Refresh token rejected")]
    RefreshRejected,

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Upstream error ({service}, status {status}): {message}")]
    Upstream {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    ConfigurationError,
    InvalidCredential,
    ExpiredCredential,
    RefreshRejected,
    StoreUnavailable,
    InvalidInput,
    UpstreamError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
            ErrorCode::InvalidCredential => "INVALID_CREDENTIAL",
            ErrorCode::ExpiredCredential => "EXPIRED_CREDENTIAL",
            ErrorCode::RefreshRejected => "REFRESH_REJECTED",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::UpstreamError => "UPSTREAM_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Configuration(_) => ErrorCode::ConfigurationError,
            AppError::InvalidCredential(_) => ErrorCode::InvalidCredential,
            AppError::ExpiredCredential => ErrorCode::ExpiredCredential,
            AppError::RefreshRejected => ErrorCode::RefreshRejected,
            AppError::StoreUnavailable(_) => ErrorCode::StoreUnavailable,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Upstream { .. } => ErrorCode::UpstreamError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
