//! Request identifier propagation
//!
//! Copies the platform-assigned request identifier from
//! [`ProxyRequestContext`](crate::ProxyRequestContext) into the request
//! [`Context`] so downstream code can read it without touching the raw
//! request.
//!
//! Both [`RequestIdLayer::new`] and [`RequestIdLayer::extended`] bind under
//! the same default key: when both run, the inner one wins. Give one of
//! them its own key with [`RequestIdLayer::with_key`] to keep both.

use crate::context::{Context, ContextKey};
use crate::handler::Handler;
use crate::middleware::layer::MiddlewareLayer;
use crate::request::ProxyRequest;

struct RequestIdKey;

/// The key both request-id layers bind under unless told otherwise.
pub fn request_id_key() -> ContextKey {
    ContextKey::of::<RequestIdKey>()
}

/// The request identifier bound under the default key, or `""`.
pub fn request_id(ctx: &Context) -> &str {
    ctx.value::<String>(&request_id_key())
        .map(String::as_str)
        .unwrap_or_default()
}

/// Which identifier a [`RequestIdLayer`] propagates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestIdSource {
    /// `requestContext.requestId`
    Primary,
    /// `requestContext.extendedRequestId`
    Extended,
}

impl RequestIdSource {
    fn extract(self, req: &ProxyRequest) -> &str {
        match self {
            Self::Primary => &req.request_context.request_id,
            Self::Extended => &req.request_context.extended_request_id,
        }
    }
}

/// Request id configuration
#[derive(Clone, Debug)]
pub struct RequestIdConfig {
    /// Identifier to propagate
    pub source: RequestIdSource,
    /// Context key the identifier is bound under
    pub key: ContextKey,
}

impl Default for RequestIdConfig {
    fn default() -> Self {
        Self {
            source: RequestIdSource::Primary,
            key: request_id_key(),
        }
    }
}

/// Middleware that binds a request identifier into the context as a
/// `String`. A missing identifier is bound as `""`.
#[derive(Clone, Debug, Default)]
pub struct RequestIdLayer {
    config: RequestIdConfig,
}

impl RequestIdLayer {
    /// Propagate the primary request id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Propagate the extended request id.
    pub fn extended() -> Self {
        Self::with_config(RequestIdConfig {
            source: RequestIdSource::Extended,
            ..RequestIdConfig::default()
        })
    }

    /// Build the layer from a full configuration.
    pub fn with_config(config: RequestIdConfig) -> Self {
        Self { config }
    }

    /// Bind under `key` instead of the default key.
    pub fn with_key(mut self, key: ContextKey) -> Self {
        self.config.key = key;
        self
    }
}

impl MiddlewareLayer for RequestIdLayer {
    fn wrap(&self, next: Handler) -> Handler {
        let RequestIdConfig { source, key } = self.config.clone();

        Handler::new(move |ctx: Context, req| {
            let ctx = ctx.with_value(key.clone(), source.extract(&req).to_string());
            next.call(ctx, req)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::layer::Chain;
    use crate::response::ProxyResponse;
    use http::StatusCode;

    fn echo(key: ContextKey) -> Handler {
        Handler::new(move |ctx: Context, _req| {
            let body = ctx.value::<String>(&key).cloned();
            async move {
                match body {
                    Some(id) => Ok(ProxyResponse::text(StatusCode::OK, id)),
                    None => Ok(ProxyResponse::new(StatusCode::NOT_FOUND)),
                }
            }
        })
    }

    fn request() -> ProxyRequest {
        ProxyRequest::new("GET", "/")
            .with_request_id("test-request-id")
            .with_extended_request_id("test-extended-id")
    }

    #[tokio::test]
    async fn binds_primary_request_id() {
        let handler = RequestIdLayer::new().wrap(echo(request_id_key()));

        let response = handler.call(Context::new(), request()).await.unwrap();

        assert_eq!(response.body, "test-request-id");
    }

    #[tokio::test]
    async fn binds_extended_request_id() {
        let handler = RequestIdLayer::extended().wrap(echo(request_id_key()));

        let response = handler.call(Context::new(), request()).await.unwrap();

        assert_eq!(response.body, "test-extended-id");
    }

    #[tokio::test]
    async fn missing_id_binds_empty_string() {
        let handler = RequestIdLayer::new().wrap(echo(request_id_key()));

        let response = handler
            .call(Context::new(), ProxyRequest::new("GET", "/"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body, "");
    }

    #[tokio::test]
    async fn custom_key_leaves_default_unbound() {
        let key = ContextKey::named("trace-id");
        let handler = RequestIdLayer::new().with_key(key.clone()).wrap(Handler::new(
            move |ctx: Context, _req| {
                let custom = ctx.value::<String>(&key).cloned().unwrap_or_default();
                let default_bound = ctx.contains(&request_id_key());
                async move {
                    assert!(!default_bound);
                    Ok(ProxyResponse::text(StatusCode::OK, custom))
                }
            },
        ));

        let response = handler.call(Context::new(), request()).await.unwrap();

        assert_eq!(response.body, "test-request-id");
    }

    #[tokio::test]
    async fn inner_layer_wins_on_shared_key() {
        let handler = Chain::new()
            .then(RequestIdLayer::new())
            .then(RequestIdLayer::extended())
            .handler(Handler::new(|ctx: Context, _req| {
                let id = request_id(&ctx).to_string();
                async move { Ok(ProxyResponse::text(StatusCode::OK, id)) }
            }));

        let response = handler.call(Context::new(), request()).await.unwrap();

        assert_eq!(response.body, "test-extended-id");
    }

    #[tokio::test]
    async fn with_config_sets_source_and_key() {
        let key = ContextKey::named("edge-id");
        let handler = RequestIdLayer::with_config(RequestIdConfig {
            source: RequestIdSource::Extended,
            key: key.clone(),
        })
        .wrap(echo(key));

        let response = handler.call(Context::new(), request()).await.unwrap();

        assert_eq!(response.body, "test-extended-id");
    }

    #[test]
    fn accessor_defaults_to_empty() {
        assert_eq!(request_id(&Context::new()), "");
    }
}
