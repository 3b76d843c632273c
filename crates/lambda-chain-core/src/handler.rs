//! Handler type and type erasure.
//!
//! A [`Handler`] is the unit of work a chain ultimately invokes: an async
//! function of a request-scoped [`Context`] and a [`ProxyRequest`] that
//! yields a [`ProxyResponse`] or an error.
//!
//! ```text
//! async fn hello(ctx, req) -> HandlerResult { … }   ← user writes this
//!        ↓ Handler::new(hello)
//! Arc<dyn Fn(Context, ProxyRequest) -> BoxFuture>    ← shared, type-erased
//!        ↓ handler.call(ctx, req)                   ← one vtable dispatch
//! Box::pin(hello(ctx, req))
//! ```
//!
//! Cloning a `Handler` is one atomic increment, so middleware can capture
//! `next` by value and hand out clones per request.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{BoxError, ChainError};
use crate::request::ProxyRequest;
use crate::response::ProxyResponse;

/// A heap-allocated, type-erased future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// What every handler resolves to.
pub type HandlerResult = Result<ProxyResponse, BoxError>;

type HandlerFn = dyn Fn(Context, ProxyRequest) -> BoxFuture<HandlerResult> + Send + Sync + 'static;

/// A cloneable, thread-safe handler.
///
/// # Example
///
/// ```rust,ignore
/// use lambda_chain_core::{Context, Handler, ProxyRequest, ProxyResponse};
///
/// let hello = Handler::new(|_ctx: Context, _req: ProxyRequest| async {
///     Ok(ProxyResponse::text(http::StatusCode::OK, "hello"))
/// });
/// ```
#[derive(Clone)]
pub struct Handler {
    inner: Arc<HandlerFn>,
}

impl Handler {
    /// Wrap an async function or closure.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Context, ProxyRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |ctx: Context, req: ProxyRequest| {
                Box::pin(f(ctx, req)) as BoxFuture<HandlerResult>
            }),
        }
    }

    /// The substitute used when a chain is finished without a terminal
    /// handler. Every call fails with [`ChainError::NoHandler`].
    pub fn missing() -> Self {
        Self::new(|_ctx, _req| async { HandlerResult::Err(ChainError::NoHandler.into()) })
    }

    /// Invoke the handler.
    pub fn call(&self, ctx: Context, req: ProxyRequest) -> BoxFuture<HandlerResult> {
        (self.inner)(ctx, req)
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::missing()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[tokio::test]
    async fn handler_invokes_wrapped_closure() {
        let handler = Handler::new(|_ctx, req: ProxyRequest| async move {
            Ok(ProxyResponse::text(StatusCode::OK, req.path))
        });

        let response = handler
            .call(Context::new(), ProxyRequest::new("GET", "/ping"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body, "/ping");
    }

    #[tokio::test]
    async fn missing_handler_fails_with_no_handler_error() {
        let err = Handler::default()
            .call(Context::new(), ProxyRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "no handler provided");
        assert_eq!(err.downcast_ref::<ChainError>(), Some(&ChainError::NoHandler));
    }
}
