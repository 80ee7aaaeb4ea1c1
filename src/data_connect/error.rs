use std::fmt::{Display, Formatter};

use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataConnectErrorCode {
    Other,
    AlreadyInitialized,
    NotInitialized,
    InvalidArgument,
    PartialError,
    Unauthorized,
    Internal,
}

impl DataConnectErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataConnectErrorCode::Other => "data-connect/other",
            DataConnectErrorCode::AlreadyInitialized => "data-connect/already-initialized",
            DataConnectErrorCode::NotInitialized => "data-connect/not-initialized",
            DataConnectErrorCode::InvalidArgument => "data-connect/invalid-argument",
            DataConnectErrorCode::PartialError => "data-connect/partial-error",
            DataConnectErrorCode::Unauthorized => "data-connect/unauthorized",
            DataConnectErrorCode::Internal => "data-connect/internal",
        }
    }
}

/// A single path component of a GraphQL error location.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataConnectErrorPathSegment {
    Field(String),
    Index(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataConnectOperationFailureResponseErrorInfo {
    pub message: String,
    pub path: Vec<DataConnectErrorPathSegment>,
}

/// Whatever the backend returned alongside a non-empty `errors` array.
#[derive(Clone, Debug, PartialEq)]
pub struct DataConnectOperationFailureResponse {
    pub data: Option<Value>,
    pub errors: Vec<DataConnectOperationFailureResponseErrorInfo>,
}

#[derive(Clone, Debug)]
pub struct DataConnectError {
    pub code: DataConnectErrorCode,
    message: String,
    response: Option<Box<DataConnectOperationFailureResponse>>,
}

impl DataConnectError {
    pub fn new(code: DataConnectErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            response: None,
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The partial payload and error list of a failed operation, if any.
    pub fn operation_response(&self) -> Option<&DataConnectOperationFailureResponse> {
        self.response.as_deref()
    }
}

impl Display for DataConnectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for DataConnectError {}

pub type DataConnectResult<T> = Result<T, DataConnectError>;

pub fn invalid_argument(message: impl Into<String>) -> DataConnectError {
    DataConnectError::new(DataConnectErrorCode::InvalidArgument, message)
}

pub fn internal_error(message: impl Into<String>) -> DataConnectError {
    DataConnectError::new(DataConnectErrorCode::Internal, message)
}

pub fn unauthorized(message: impl Into<String>) -> DataConnectError {
    DataConnectError::new(DataConnectErrorCode::Unauthorized, message)
}

pub fn already_initialized(message: impl Into<String>) -> DataConnectError {
    DataConnectError::new(DataConnectErrorCode::AlreadyInitialized, message)
}

pub fn not_initialized(message: impl Into<String>) -> DataConnectError {
    DataConnectError::new(DataConnectErrorCode::NotInitialized, message)
}

pub fn other_error(message: impl Into<String>) -> DataConnectError {
    DataConnectError::new(DataConnectErrorCode::Other, message)
}

pub fn operation_error(
    message: impl Into<String>,
    response: DataConnectOperationFailureResponse,
) -> DataConnectError {
    DataConnectError {
        code: DataConnectErrorCode::PartialError,
        message: message.into(),
        response: Some(Box::new(response)),
    }
}
