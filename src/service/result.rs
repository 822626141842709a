//! Uniform outcome returned by every facade operation.

use serde::Serialize;

use crate::db::StoreError;

/// Failure category carried alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    BackendUnavailable,
    MalformedStoredData,
}

impl From<&StoreError> for ErrorKind {
    fn from(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::InvalidInput(_) => ErrorKind::InvalidInput,
            StoreError::MalformedData(_) => ErrorKind::MalformedStoredData,
            StoreError::BackendUnavailable(_) | StoreError::Database(_) | StoreError::Io(_) => {
                ErrorKind::BackendUnavailable
            }
        }
    }
}

/// `{success, data?, message?}`. Failures never carry data.
#[derive(Debug, Clone, Serialize)]
pub struct PersistenceResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip)]
    pub error: Option<ErrorKind>,
}

impl<T> PersistenceResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            error: Some(kind),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> PersistenceResult<U> {
        PersistenceResult {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
        }
    }

    /// Split into a plain `Result`, keeping the message on both sides.
    pub fn into_result(self) -> Result<(T, Option<String>), (ErrorKind, String)> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok((data, self.message)),
            _ => Err((
                self.error.unwrap_or(ErrorKind::BackendUnavailable),
                self.message.unwrap_or_else(|| "Operation failed".to_string()),
            )),
        }
    }
}
