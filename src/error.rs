// src/error.rs

use thiserror::Error;

/// Everything that can go wrong between a sheet range and a list of records.
///
/// An empty sheet is not an error (the reader returns an empty response), and
/// malformed rows never raise: they degrade to records with empty fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// Missing API key, spreadsheet id or sheet name. Not retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Non-2xx response, transport failure or an unreadable body.
    /// `status` is `None` when no response was received at all.
    #[error("{}", request_message(*status, message))]
    Request {
        status: Option<u16>,
        message: String,
    },
}

impl SheetError {
    pub fn config(msg: impl Into<String>) -> Self {
        SheetError::Configuration(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        SheetError::Request {
            status: None,
            message: msg.into(),
        }
    }

    pub fn status(code: u16, msg: impl Into<String>) -> Self {
        SheetError::Request {
            status: Some(code),
            message: msg.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, SheetError::Request { .. })
    }
}

fn request_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("request failed with status {}: {}", code, message),
        None => format!("request failed: {}", message),
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_display_includes_status() {
        let err = SheetError::status(403, "The caller does not have permission");
        assert_eq!(
            err.to_string(),
            "request failed with status 403: The caller does not have permission"
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn configuration_is_not_retryable() {
        let err = SheetError::config("API key is missing");
        assert_eq!(err.to_string(), "configuration error: API key is missing");
        assert!(!err.is_retryable());
    }
}
