//! Content-Type allow-list middleware
//!
//! Rejects requests whose `Content-Type` media type is not in a configured
//! set. Only the `type/subtype` part takes part in the comparison; any
//! parameters (`charset=utf-8`, `boundary=..`) are ignored and both sides
//! are lowercased. Malformed parameters and repeated parameter names make
//! the header invalid.
//!
//! # Example
//!
//! ```rust,ignore
//! use lambda_chain_core::{AllowContentTypeLayer, Chain};
//!
//! let chain = Chain::new()
//!     .then(AllowContentTypeLayer::new(["application/json", "application/xml"]));
//! ```

use std::collections::HashSet;

use http::StatusCode;

use crate::handler::Handler;
use crate::middleware::layer::MiddlewareLayer;
use crate::request::ProxyRequest;
use crate::response::ProxyResponse;

/// Default body of the rejection response.
pub const DEFAULT_UNSUPPORTED_BODY: &str = "Unsupported Media Type";

/// Default `Content-Type` of the rejection response.
pub const DEFAULT_ERROR_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Content-Type gate configuration
#[derive(Clone, Debug)]
pub struct AllowContentTypeConfig {
    /// Allowed media types, as given by the caller
    pub allowed_types: Vec<String>,
    /// `Content-Type` header of the 415 response
    pub error_content_type: String,
    /// Body of the 415 response
    pub error_body: String,
}

impl Default for AllowContentTypeConfig {
    fn default() -> Self {
        Self {
            allowed_types: Vec::new(),
            error_content_type: DEFAULT_ERROR_CONTENT_TYPE.to_string(),
            error_body: DEFAULT_UNSUPPORTED_BODY.to_string(),
        }
    }
}

/// Middleware that answers `415 Unsupported Media Type` unless the request
/// carries an allowed `Content-Type`.
///
/// Requests without the header are rejected too. An empty allow-list
/// rejects everything.
#[derive(Clone, Debug)]
pub struct AllowContentTypeLayer {
    allowed: HashSet<String>,
    error_response: ProxyResponse,
}

impl AllowContentTypeLayer {
    /// Allow the given media types.
    ///
    /// Entries that do not parse as a media type are dropped.
    pub fn new<I, S>(allowed_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_config(AllowContentTypeConfig {
            allowed_types: allowed_types.into_iter().map(Into::into).collect(),
            ..AllowContentTypeConfig::default()
        })
    }

    /// Create the layer from a full configuration
    pub fn with_config(config: AllowContentTypeConfig) -> Self {
        let allowed = config
            .allowed_types
            .iter()
            .filter_map(|ct| media_type(ct))
            .collect();

        Self {
            allowed,
            error_response: rejection(&config.error_content_type, &config.error_body),
        }
    }

    /// Override the rejection response's `Content-Type` and body.
    pub fn with_response(mut self, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        self.error_response = rejection(&content_type.into(), &body.into());
        self
    }

    /// Whether `req` may pass.
    pub fn allows(&self, req: &ProxyRequest) -> bool {
        req.header(http::header::CONTENT_TYPE.as_str())
            .filter(|value| !value.is_empty())
            .and_then(media_type)
            .is_some_and(|media_type| self.allowed.contains(&media_type))
    }
}

impl MiddlewareLayer for AllowContentTypeLayer {
    fn wrap(&self, next: Handler) -> Handler {
        let gate = self.clone();

        Handler::new(move |ctx, req| {
            let next = next.clone();
            let verdict = if gate.allows(&req) {
                None
            } else {
                tracing::debug!(
                    content_type = req.header(http::header::CONTENT_TYPE.as_str()).unwrap_or_default(),
                    "content type not allowed"
                );
                Some(gate.error_response.clone())
            };

            async move {
                match verdict {
                    Some(rejected) => Ok(rejected),
                    None => next.call(ctx, req).await,
                }
            }
        })
    }
}

/// Lowercased `type/subtype` of a content-type value.
///
/// Whitespace around the media type and around `;` is allowed. A parameter
/// without a name or `=`, or one named twice, makes the value invalid.
fn media_type(value: &str) -> Option<String> {
    let mut parts = value.split(';');
    let essence = parts.next()?.trim().to_ascii_lowercase();

    let mut seen = HashSet::new();
    for param in parts.map(str::trim).filter(|param| !param.is_empty()) {
        let (name, _) = param.split_once('=')?;
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() || !seen.insert(name) {
            return None;
        }
    }

    essence
        .parse::<mime::Mime>()
        .ok()
        .map(|mime| mime.essence_str().to_string())
}

fn rejection(content_type: &str, body: &str) -> ProxyResponse {
    ProxyResponse::new(StatusCode::UNSUPPORTED_MEDIA_TYPE)
        .with_header("Content-Type", content_type)
        .with_body(body)
}
