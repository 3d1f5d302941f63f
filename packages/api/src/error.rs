//! Standard error body returned by the API for non-2xx responses.

use serde::{Deserialize, Serialize};

/// The JSON body of an API error.
///
/// ```json
/// {
///   "error": "The requested video couldn't be found.",
///   "link": null,
///   "developer_message": "The requested video couldn't be found.",
///   "error_code": 5000
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable description of the problem, suitable for end users.
    pub error: String,

    /// More detailed description aimed at developers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer_message: Option<String>,

    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,

    /// Documentation link for the error, when the API provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            developer_message: None,
            error_code: None,
            link: None,
        }
    }

    /// The most specific message available: the developer message when
    /// present, otherwise `error`.
    pub fn message(&self) -> &str {
        self.developer_message.as_deref().unwrap_or(&self.error)
    }
}
