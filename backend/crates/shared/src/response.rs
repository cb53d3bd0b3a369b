//! Response Envelope
//!
//! Every endpoint answers with `{status, message, data}`.

use std::borrow::Cow;

use serde::Serialize;

/// Outcome marker of an [`ApiResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Response envelope
///
/// `data` is serialized as `null` when absent.
///
/// ## Examples
/// ```rust
/// use kernel::response::ApiResponse;
///
/// let body = ApiResponse::<()>::success("logged out");
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["status"], "success");
/// assert!(json["data"].is_null());
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub message: Cow<'static, str>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: None,
        }
    }

    pub fn success_with(message: impl Into<Cow<'static, str>>, data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Cow::Owned(message.into()),
            data: None,
        }
    }
}
