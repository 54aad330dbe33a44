use thiserror::Error;

/// Failure kinds of the data access layer.
///
/// Facades never hand these to callers directly: they collapse every failure
/// into its `Display` text and keep it in their `error` field.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("No authenticated user")]
    Unauthenticated,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Backend failure: {0}")]
    BackendFailure(String),

    #[error("Serialization failure: {0}")]
    SerializationFailure(String),

    #[error("{0} is already in progress")]
    InFlight(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Kind of an [`AppError`] without its message, kept by the facades next to
/// the error text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    NotFound,
    BackendFailure,
    SerializationFailure,
    InFlight,
    InvalidInput,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthenticated => ErrorKind::Unauthenticated,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::BackendFailure(_) => ErrorKind::BackendFailure,
            AppError::SerializationFailure(_) => ErrorKind::SerializationFailure,
            AppError::InFlight(_) => ErrorKind::InFlight,
            AppError::InvalidInput(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::BackendFailure(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<AppError>() {
            Ok(app_err) => app_err,
            Err(err) => AppError::BackendFailure(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationFailure(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::BackendFailure(err.to_string())
    }
}
