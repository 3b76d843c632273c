//! Request body decoding.
//!
//! Bodies are decoded either by a type's own [`RequestUnmarshaler`] impl or
//! by sniffing the serialization format from the first non-whitespace
//! character and handing the bytes to `serde_json` or `quick-xml`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::de::DeserializeOwned;

/// Boxed error returned by custom decoders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while turning a raw body into a typed value.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The body was flagged as base64 but is not valid standard base64.
    #[error("invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),

    /// JSON deserialization failed.
    #[error("invalid JSON body: {0}")]
    Json(#[from] serde_json::Error),

    /// XML deserialization failed.
    #[error("invalid XML body: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// An XML body was not valid UTF-8.
    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A [`RequestUnmarshaler`] impl rejected the body.
    #[error("custom decoder failed: {0}")]
    Custom(#[source] BoxError),
}

/// Serialization format guessed from a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// First non-whitespace character is `{` or `[`.
    Json,
    /// First non-whitespace character is `<`.
    Xml,
    /// Anything else, including an all-whitespace body.
    Unknown,
}

impl BodyFormat {
    /// Inspect the first non-whitespace character of `body`.
    pub fn detect(body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        match text.chars().find(|c| !c.is_whitespace()) {
            Some('{') | Some('[') => Self::Json,
            Some('<') => Self::Xml,
            _ => Self::Unknown,
        }
    }
}

/// Custom decoding that replaces format detection entirely.
///
/// Only used by a layer built with `custom_decode()`; without that call the
/// body is still auto-detected as JSON or XML, even for types implementing
/// this trait.
///
/// ```rust,ignore
/// use lambda_chain_validate::{BoxError, RequestUnmarshaler};
///
/// struct Csv(Vec<String>);
///
/// impl RequestUnmarshaler for Csv {
///     fn unmarshal_request(body: &[u8]) -> Result<Self, BoxError> {
///         let text = std::str::from_utf8(body)?;
///         Ok(Csv(text.split(',').map(str::to_owned).collect()))
///     }
/// }
/// ```
pub trait RequestUnmarshaler: Sized {
    /// Build a value from the raw (already base64-decoded) body bytes.
    fn unmarshal_request(body: &[u8]) -> Result<Self, BoxError>;
}

/// Decode `body` as JSON or XML depending on [`BodyFormat::detect`].
///
/// [`BodyFormat::Unknown`] falls back to a JSON attempt, so a body such as
/// `hello` fails with a JSON error rather than being rejected up front.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    match BodyFormat::detect(body) {
        BodyFormat::Xml => {
            let text = std::str::from_utf8(body)?;
            Ok(quick_xml::de::from_str(text)?)
        }
        BodyFormat::Json | BodyFormat::Unknown => Ok(serde_json::from_slice(body)?),
    }
}

/// Decode a standard (padded) base64 body.
///
/// `\r` and `\n` are skipped, so line-wrapped (MIME style) bodies decode
/// the same as single-line ones.
pub fn decode_base64(body: &str) -> Result<Vec<u8>, DecodeError> {
    if !body.contains(['\r', '\n']) {
        return Ok(STANDARD.decode(body)?);
    }

    let unwrapped: String = body.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    Ok(STANDARD.decode(unwrapped)?)
}
