//! API Gateway proxy response type.

use std::collections::HashMap;

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// An outbound API Gateway proxy response.
///
/// # Shortcuts
///
/// ```rust,ignore
/// use http::StatusCode;
/// use lambda_chain_core::ProxyResponse;
///
/// ProxyResponse::json(StatusCode::OK, r#"{"id":1}"#);
/// ProxyResponse::text(StatusCode::BAD_REQUEST, "missing name");
/// ProxyResponse::new(StatusCode::NO_CONTENT);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    /// Response with no body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
            ..Self::default()
        }
    }

    /// `application/json` response.
    pub fn json(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header(http::header::CONTENT_TYPE.as_str(), "application/json")
            .with_body(body)
    }

    /// `text/plain; charset=utf-8` response.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header(http::header::CONTENT_TYPE.as_str(), "text/plain; charset=utf-8")
            .with_body(body)
    }

    /// The status code as a typed value.
    ///
    /// Codes outside `100..=999` (including the default `0`) read as
    /// `500 Internal Server Error`.
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add a header. Returns `self` for chaining.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}
