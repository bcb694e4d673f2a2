use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// `{status, code, data}` on success, `{status, code, message}` on failure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub status: ResponseStatus,
    pub code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unmapped: Option<Vec<String>>,
}

impl ResponseEnvelope {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            code: STATUS_OK,
            message: None,
            data: Some(data),
            unmapped: None,
        }
    }

    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            code,
            message: Some(message.into()),
            data: None,
            unmapped: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::error(STATUS_BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::error(STATUS_NOT_FOUND, message)
    }

    /// 500 envelope carrying the underlying cause.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        Self::error(STATUS_INTERNAL_ERROR, format!("Processing failed: {cause}"))
    }

    pub fn with_unmapped(mut self, unmapped: Vec<String>) -> Self {
        self.unmapped = Some(unmapped);
        self
    }

    pub fn is_error(&self) -> bool {
        self.status == ResponseStatus::Error
    }
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
