//! Body decode & validate middleware
//!
//! Turns the request body into a typed value, checks it, and binds it into
//! the [`Context`] for the handler. Any failure answers with
//! `400 Bad Request` and the handler never runs.
//!
//! ```text
//! body ── empty? ──────────────────────────────► 400
//!   │ is_base64_encoded → base64 (standard alphabet)
//!   ▼
//! decode   D = AutoDetect    JSON / XML by first non-whitespace char
//!          D = CustomDecode  RequestUnmarshaler::unmarshal_request
//!   ▼
//! check    V = TagRules      validator attribute rules
//!          V = CustomValidate SelfValidate::self_validate
//!   ▼
//! ctx.with_value(key, value) → next
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lambda_chain_core::{validated, Chain, Context, Handler, ValidateLayer};
//!
//! let handler = Chain::new()
//!     .then(ValidateLayer::<CreateUser>::new())
//!     .handler(Handler::new(|ctx: Context, _req| async move {
//!         let user = validated::<CreateUser>(&ctx);
//!         // ...
//!     }));
//! ```

use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

use http::StatusCode;
use lambda_chain_validate::{
    decode_base64, AutoDetect, CustomDecode, CustomValidate, DecodeError, DecodeWith, TagRules,
    ValidateWith, ValidationError,
};

use crate::context::{Context, ContextKey};
use crate::handler::Handler;
use crate::middleware::content_type::DEFAULT_ERROR_CONTENT_TYPE;
use crate::middleware::layer::MiddlewareLayer;
use crate::request::ProxyRequest;
use crate::response::ProxyResponse;

/// Default body of the rejection response.
pub const DEFAULT_BAD_REQUEST_BODY: &str = "Bad Request: Validation Failed";

struct ValidatedKey;

/// The key [`ValidateLayer`] binds under unless told otherwise.
pub fn validated_key() -> ContextKey {
    ContextKey::of::<ValidatedKey>()
}

/// The value bound under the default key, if it is a `T`.
///
/// Every `ValidateLayer` without a custom key shares this key, so with two
/// of them in one chain only the inner value is visible here.
pub fn validated<T: Any>(ctx: &Context) -> Option<&T> {
    ctx.value::<T>(&validated_key())
}

#[derive(Debug, thiserror::Error)]
enum Rejection {
    #[error("request body is empty")]
    EmptyBody,
    #[error("failed to decode request body: {0}")]
    Decode(#[from] DecodeError),
    #[error("{0}")]
    Invalid(#[from] ValidationError),
}

/// Decode & validate configuration
#[derive(Clone, Debug)]
pub struct ValidateConfig {
    /// Context key the validated value is bound under
    pub key: ContextKey,
    /// `Content-Type` header of the 400 response
    pub error_content_type: String,
    /// Body of the 400 response
    pub error_body: String,
}

impl Default for ValidateConfig {
    fn default() -> Self {
        Self {
            key: validated_key(),
            error_content_type: DEFAULT_ERROR_CONTENT_TYPE.to_string(),
            error_body: DEFAULT_BAD_REQUEST_BODY.to_string(),
        }
    }
}

/// Middleware that decodes and validates the body as a `T`.
///
/// `D` picks the decoder and `V` the validator; see
/// [`custom_decode`](ValidateLayer::custom_decode) and
/// [`custom_validate`](ValidateLayer::custom_validate).
///
/// Implementing [`RequestUnmarshaler`](lambda_chain_validate::RequestUnmarshaler)
/// or [`SelfValidate`](lambda_chain_validate::SelfValidate) on `T` is not
/// enough on its own: until `.custom_decode()` / `.custom_validate()` is
/// called, the layer still auto-detects JSON/XML and runs the
/// `#[validate(...)]` rules.
pub struct ValidateLayer<T, D = AutoDetect, V = TagRules> {
    config: ValidateConfig,
    _marker: PhantomData<fn() -> (T, D, V)>,
}

impl<T> ValidateLayer<T> {
    /// Auto-detected JSON/XML decoding and attribute-rule validation.
    pub fn new() -> Self {
        Self::with_config(ValidateConfig::default())
    }
}

impl<T> Default for ValidateLayer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, D, V> ValidateLayer<T, D, V> {
    /// Build the layer from a full configuration, keeping `D` and `V`.
    pub fn with_config(config: ValidateConfig) -> Self {
        Self {
            config,
            _marker: PhantomData,
        }
    }

    /// Bind the value under `key` instead of the default key.
    pub fn with_key(mut self, key: ContextKey) -> Self {
        self.config.key = key;
        self
    }

    /// Override the rejection response's `Content-Type` and body.
    pub fn with_response(mut self, content_type: impl Into<String>, body: impl Into<String>) -> Self {
        self.config.error_content_type = content_type.into();
        self.config.error_body = body.into();
        self
    }

    /// Decode with `T`'s [`RequestUnmarshaler`](lambda_chain_validate::RequestUnmarshaler)
    /// instead of format detection.
    pub fn custom_decode(self) -> ValidateLayer<T, CustomDecode, V> {
        ValidateLayer::with_config(self.config)
    }

    /// Validate with `T`'s [`SelfValidate`](lambda_chain_validate::SelfValidate)
    /// instead of attribute rules.
    pub fn custom_validate(self) -> ValidateLayer<T, D, CustomValidate> {
        ValidateLayer::with_config(self.config)
    }
}

impl<T, D, V> Clone for ValidateLayer<T, D, V> {
    fn clone(&self) -> Self {
        Self::with_config(self.config.clone())
    }
}

impl<T, D, V> fmt::Debug for ValidateLayer<T, D, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidateLayer")
            .field("type", &std::any::type_name::<T>())
            .field("config", &self.config)
            .finish()
    }
}

impl<T, D, V> ValidateLayer<T, D, V>
where
    D: DecodeWith<T>,
    V: ValidateWith<T>,
{
    fn extract(req: &ProxyRequest) -> Result<T, Rejection> {
        if req.body.is_empty() {
            return Err(Rejection::EmptyBody);
        }

        let raw: Cow<'_, [u8]> = if req.is_base64_encoded {
            Cow::Owned(decode_base64(&req.body)?)
        } else {
            Cow::Borrowed(req.body.as_bytes())
        };

        let value = D::decode(&raw)?;
        V::check(&value)?;
        Ok(value)
    }
}

impl<T, D, V> MiddlewareLayer for ValidateLayer<T, D, V>
where
    T: Send + Sync + 'static,
    D: DecodeWith<T>,
    V: ValidateWith<T>,
{
    fn wrap(&self, next: Handler) -> Handler {
        let key = self.config.key.clone();
        let error_response = ProxyResponse::new(StatusCode::BAD_REQUEST)
            .with_header("Content-Type", self.config.error_content_type.as_str())
            .with_body(self.config.error_body.as_str());

        Handler::new(move |ctx: Context, req| {
            let next = next.clone();
            let ctx = match Self::extract(&req) {
                Ok(value) => Ok(ctx.with_value(key.clone(), value)),
                Err(reason) => {
                    tracing::debug!(
                        target_type = std::any::type_name::<T>(),
                        error = %reason,
                        "request body rejected"
                    );
                    Err(error_response.clone())
                }
            };

            async move {
                match ctx {
                    Ok(ctx) => next.call(ctx, req).await,
                    Err(rejected) => Ok(rejected),
                }
            }
        })
    }
}
