//! Middleware infrastructure for lambda-chain
//!
//! [`layer`] holds the composition engine; the other modules are the
//! built-in middleware. Everything is re-exported from the crate root.
//!
//! # Example
//!
//! ```rust,ignore
//! use lambda_chain_core::middleware::{AllowContentTypeLayer, Chain, RequestIdLayer, StructuredLogger};
//!
//! let handler = Chain::new()
//!     .then(StructuredLogger::new())
//!     .then(RequestIdLayer::new())
//!     .then(AllowContentTypeLayer::new(["application/json"]))
//!     .handler(my_handler);
//! ```

mod content_type;
pub mod layer;
mod logging;
mod request_id;
mod validate;

pub use content_type::{
    AllowContentTypeConfig, AllowContentTypeLayer, DEFAULT_ERROR_CONTENT_TYPE, DEFAULT_UNSUPPORTED_BODY,
};
pub use layer::{compose, Chain, Middleware, MiddlewareLayer};
pub use logging::{StructuredLogger, StructuredLoggerConfig, OMITTED_BODY};
pub use request_id::{request_id, request_id_key, RequestIdConfig, RequestIdLayer, RequestIdSource};
pub use validate::{validated, validated_key, ValidateConfig, ValidateLayer, DEFAULT_BAD_REQUEST_BODY};
