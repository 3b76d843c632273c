//! API Gateway proxy request type.
//!
//! Field names follow the proxy integration event JSON, so a raw Lambda
//! payload deserializes straight into [`ProxyRequest`]. API Gateway sends
//! `null` for absent maps and bodies; those become empty values.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Platform metadata attached to every proxied request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyRequestContext {
    #[serde(deserialize_with = "null_as_default")]
    pub account_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub resource_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stage: String,
    /// Primary request identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub request_id: String,
    /// Extended request identifier.
    #[serde(deserialize_with = "null_as_default")]
    pub extended_request_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub domain_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub http_method: String,
    pub request_time_epoch: i64,
}

/// An inbound API Gateway proxy request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(deserialize_with = "null_as_default")]
    pub path: String,
    #[serde(deserialize_with = "null_as_default")]
    pub http_method: String,
    #[serde(deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub query_string_parameters: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub path_parameters: HashMap<String, String>,
    pub request_context: ProxyRequestContext,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    pub is_base64_encoded: bool,
}

impl ProxyRequest {
    /// A request with the given method and path and nothing else.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            path: path.into(),
            ..Self::default()
        }
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

    /// Set a plain-text body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self.is_base64_encoded = false;
        self
    }

    /// Set a body that is already base64-encoded.
    pub fn with_base64_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self.is_base64_encoded = true;
        self
    }

    /// Set the primary request identifier.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_context.request_id = id.into();
        self
    }

    /// Set the extended request identifier.
    pub fn with_extended_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_context.extended_request_id = id.into();
        self
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
