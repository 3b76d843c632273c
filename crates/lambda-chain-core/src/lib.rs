//! # lambda-chain Core
//!
//! Core library providing the handler/middleware chain for API Gateway
//! proxy handlers, the request-scoped [`Context`], and the built-in
//! middleware.
//!
//! This crate is not meant to be used directly. Use `lambda-chain` instead.

mod context;
mod error;
mod handler;
pub mod middleware;
mod request;
mod response;

// Public API
pub use context::{Context, ContextKey};
pub use error::{BoxError, ChainError, Result};
pub use handler::{BoxFuture, Handler, HandlerResult};
pub use middleware::{
    compose, request_id, request_id_key, validated, validated_key, AllowContentTypeConfig,
    AllowContentTypeLayer, Chain, Middleware, MiddlewareLayer, RequestIdConfig, RequestIdLayer,
    RequestIdSource, StructuredLogger, StructuredLoggerConfig, ValidateConfig, ValidateLayer,
};
pub use request::{ProxyRequest, ProxyRequestContext};
pub use response::ProxyResponse;
