//! # lambda-chain
//!
//! Composable middleware for AWS API Gateway proxy handlers.
//!
//! A handler is an async function of a request-scoped [`Context`] and a
//! [`ProxyRequest`]. Middleware wraps handlers, and a [`Chain`] applies a
//! list of middleware in declaration order: the first one added sees the
//! request first and the response last.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lambda_chain::prelude::*;
//!
//! #[derive(Debug, Deserialize, Validate)]
//! struct CreateUser {
//!     #[validate(length(min = 1))]
//!     name: String,
//!     #[validate(email)]
//!     email: String,
//! }
//!
//! async fn create_user(ctx: Context, _req: ProxyRequest) -> HandlerResult {
//!     let user = validated::<CreateUser>(&ctx).ok_or("user not bound")?;
//!     info!(request_id = request_id(&ctx), name = %user.name, "creating user");
//!     Ok(ProxyResponse::text(StatusCode::CREATED, "created"))
//! }
//!
//! let handler = Chain::new()
//!     .then(StructuredLogger::new())
//!     .then(RequestIdLayer::new())
//!     .then(AllowContentTypeLayer::new(["application/json", "application/xml"]))
//!     .then(ValidateLayer::<CreateUser>::new())
//!     .handler(Handler::new(create_user));
//! ```
//!
//! ## Built-in middleware
//!
//! - [`AllowContentTypeLayer`] - `415` unless the `Content-Type` media type is allowed
//! - [`RequestIdLayer`] - binds the platform request id into the context
//! - [`StructuredLogger`] - one `tracing` event per request and one per outcome
//! - [`ValidateLayer`] - decodes and validates the body, `400` on failure

// Re-export core functionality
pub use lambda_chain_core::*;

pub use http::StatusCode;

// Re-export validation building blocks
pub use lambda_chain_validate::{
    decode_base64, decode_body, AutoDetect, BodyFormat, CustomDecode, CustomValidate, DecodeError,
    DecodeWith, FieldError, RequestUnmarshaler, SelfValidate, TagRules, ValidateWith,
    ValidationError,
};

/// Prelude module - import everything you need with `use lambda_chain::prelude::*`
pub mod prelude {
    // Core types
    pub use lambda_chain_core::{
        compose,
        // Accessors
        request_id,
        validated,
        // Middleware
        AllowContentTypeLayer,
        Chain,
        // Request context
        Context,
        ContextKey,
        Handler,
        HandlerResult,
        Middleware,
        MiddlewareLayer,
        ProxyRequest,
        ProxyResponse,
        RequestIdLayer,
        Result,
        StructuredLogger,
        ValidateLayer,
    };

    // Validation capabilities
    pub use lambda_chain_validate::{RequestUnmarshaler, SelfValidate, ValidationError};

    // Re-export validation - use validator derive macro directly
    pub use validator::Validate;

    // Re-export commonly used external types
    pub use lambda_chain_core::BoxError;
    pub use serde::{Deserialize, Serialize};
    pub use http::StatusCode;
    pub use tracing::{debug, error, info, trace, warn};
}
