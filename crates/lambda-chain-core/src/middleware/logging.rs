//! Structured request/response logging middleware
//!
//! Emits one `tracing` event before the inner handler runs and one after it
//! returns:
//!
//! | message                            | level   | fields                                        |
//! |------------------------------------|---------|-----------------------------------------------|
//! | `request received`                 | `INFO`  | `request`, `bodySize`                         |
//! | `request processed successfully`   | `INFO`  | `response`, `bodySize`, `duration`            |
//! | `request processing failed`        | `ERROR` | `response`, `bodySize`, `duration`, `error`   |
//!
//! Bodies are replaced by [`OMITTED_BODY`] in the logged copies unless body
//! logging is switched on. `bodySize` is always the real length. The
//! request and response that flow through the chain are never modified.
//!
//! # Example
//!
//! ```rust,ignore
//! use lambda_chain_core::{Chain, StructuredLogger};
//!
//! let chain = Chain::new().then(StructuredLogger::new().request_body_logging(true));
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use tracing::Dispatch;

use crate::error::BoxError;
use crate::handler::Handler;
use crate::middleware::layer::MiddlewareLayer;
use crate::request::ProxyRequest;
use crate::response::ProxyResponse;

/// Stands in for a body that is not logged.
pub const OMITTED_BODY: &str = "(omitted)";

/// Structured logger configuration
#[derive(Clone, Default)]
pub struct StructuredLoggerConfig {
    /// Whether the request body appears in the `request` field
    pub log_request_body: bool,
    /// Whether the response body appears in the `response` field
    pub log_response_body: bool,
    /// Subscriber to emit to. `None` uses the one current at request time.
    pub dispatch: Option<Dispatch>,
}

impl fmt::Debug for StructuredLoggerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuredLoggerConfig")
            .field("log_request_body", &self.log_request_body)
            .field("log_response_body", &self.log_response_body)
            .field("dispatch", &self.dispatch.is_some())
            .finish()
    }
}

/// Middleware that logs every request and its outcome.
///
/// The inner handler's result is returned unchanged, errors included.
#[derive(Clone, Debug, Default)]
pub struct StructuredLogger {
    config: StructuredLoggerConfig,
}

impl StructuredLogger {
    /// Log to the current subscriber with bodies omitted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a logger from a full configuration.
    pub fn with_config(config: StructuredLoggerConfig) -> Self {
        Self { config }
    }

    /// Emit to `dispatch` instead of the current subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.config.dispatch = Some(dispatch);
        self
    }

    /// Include the request body in the `request received` record.
    pub fn request_body_logging(mut self, enabled: bool) -> Self {
        self.config.log_request_body = enabled;
        self
    }

    /// Include the response body in the outcome record.
    pub fn response_body_logging(mut self, enabled: bool) -> Self {
        self.config.log_response_body = enabled;
        self
    }
}

impl MiddlewareLayer for StructuredLogger {
    fn wrap(&self, next: Handler) -> Handler {
        let config = self.config.clone();

        Handler::new(move |ctx, req| {
            let next = next.clone();
            let config = config.clone();

            async move {
                let start = Instant::now();
                log_request(&config, &req);

                let result = next.call(ctx, req).await;

                log_outcome(&config, &result, start.elapsed());
                result
            }
        })
    }
}

fn emit(dispatch: Option<&Dispatch>, event: impl FnOnce()) {
    match dispatch {
        Some(dispatch) => tracing::dispatcher::with_default(dispatch, event),
        None => event(),
    }
}

fn log_request(config: &StructuredLoggerConfig, req: &ProxyRequest) {
    let body_size = req.body.len();
    let mut logged = req.clone();
    if !config.log_request_body {
        logged.body = OMITTED_BODY.to_string();
    }

    emit(config.dispatch.as_ref(), || {
        tracing::info!(request = ?logged, bodySize = body_size, "request received");
    });
}

fn log_outcome(
    config: &StructuredLoggerConfig,
    result: &Result<ProxyResponse, BoxError>,
    duration: Duration,
) {
    let mut logged = match result {
        Ok(response) => response.clone(),
        Err(_) => ProxyResponse::default(),
    };
    let body_size = logged.body.len();
    if !config.log_response_body {
        logged.body = OMITTED_BODY.to_string();
    }

    emit(config.dispatch.as_ref(), || match result {
        Ok(_) => tracing::info!(
            response = ?logged,
            bodySize = body_size,
            duration = ?duration,
            "request processed successfully"
        ),
        Err(err) => tracing::error!(
            response = ?logged,
            bodySize = body_size,
            duration = ?duration,
            error = %err,
            "request processing failed"
        ),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::handler::HandlerResult;
    use http::StatusCode;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Debug, Clone)]
    struct CapturedEvent {
        level: Level,
        fields: HashMap<String, String>,
    }

    impl CapturedEvent {
        fn message(&self) -> &str {
            self.fields.get("message").map(String::as_str).unwrap_or_default()
        }

        fn field(&self, name: &str) -> &str {
            self.fields.get(name).map(String::as_str).unwrap_or_default()
        }
    }

    /// A subscriber layer that records every event it sees
    #[derive(Clone, Default)]
    struct EventCapture {
        events: Arc<Mutex<Vec<CapturedEvent>>>,
    }

    impl EventCapture {
        fn events(&self) -> Vec<CapturedEvent> {
            self.events.lock().unwrap().clone()
        }

        fn dispatch(&self) -> Dispatch {
            Dispatch::new(tracing_subscriber::registry().with(self.clone()))
        }
    }

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
            let mut fields = HashMap::new();
            event.record(&mut FieldVisitor { fields: &mut fields });
            self.events.lock().unwrap().push(CapturedEvent {
                level: *event.metadata().level(),
                fields,
            });
        }
    }

    struct FieldVisitor<'a> {
        fields: &'a mut HashMap<String, String>,
    }

    impl<'a> tracing::field::Visit for FieldVisitor<'a> {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            self.fields.insert(field.name().to_string(), format!("{:?}", value));
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            self.fields.insert(field.name().to_string(), value.to_string());
        }

        fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn ok_handler(body: &'static str) -> Handler {
        Handler::new(move |_ctx, _req| async move {
            Ok(ProxyResponse::json(StatusCode::OK, body))
        })
    }

    fn request() -> ProxyRequest {
        ProxyRequest::new("POST", "/users")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"password":"hunter2"}"#)
    }

    #[tokio::test]
    async fn logs_request_and_success_with_bodies_omitted() {
        let capture = EventCapture::default();
        let handler = StructuredLogger::new()
            .with_dispatch(capture.dispatch())
            .wrap(ok_handler(r#"{"token":"secret"}"#));

        let response = handler.call(Context::new(), request()).await.unwrap();
        assert_eq!(response.body, r#"{"token":"secret"}"#);

        let events = capture.events();
        assert_eq!(events.len(), 2);

        let received = &events[0];
        assert_eq!(received.level, Level::INFO);
        assert_eq!(received.message(), "request received");
        assert_eq!(received.field("bodySize"), "22");
        assert!(!received.fields.contains_key("body_size"));
        assert!(received.field("request").contains(OMITTED_BODY));
        assert!(!received.field("request").contains("hunter2"));

        let processed = &events[1];
        assert_eq!(processed.level, Level::INFO);
        assert_eq!(processed.message(), "request processed successfully");
        assert_eq!(processed.field("bodySize"), "18");
        assert!(processed.field("response").contains(OMITTED_BODY));
        assert!(!processed.field("response").contains("secret"));
        assert!(processed.fields.contains_key("duration"));
        assert!(!processed.fields.contains_key("error"));
    }

    #[tokio::test]
    async fn body_logging_can_be_enabled() {
        let capture = EventCapture::default();
        let handler = StructuredLogger::new()
            .with_dispatch(capture.dispatch())
            .request_body_logging(true)
            .response_body_logging(true)
            .wrap(ok_handler("visible-response"));

        handler.call(Context::new(), request()).await.unwrap();

        let events = capture.events();
        assert!(events[0].field("request").contains("hunter2"));
        assert!(!events[0].field("request").contains(OMITTED_BODY));
        assert!(events[1].field("response").contains("visible-response"));
    }

    #[tokio::test]
    async fn with_config_applies_every_setting() {
        let capture = EventCapture::default();
        let handler = StructuredLogger::with_config(StructuredLoggerConfig {
            log_request_body: true,
            log_response_body: false,
            dispatch: Some(capture.dispatch()),
        })
        .wrap(ok_handler("hidden-response"));

        handler.call(Context::new(), request()).await.unwrap();

        let events = capture.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].field("request").contains("hunter2"));
        assert!(events[1].field("response").contains(OMITTED_BODY));
        assert!(!events[1].field("response").contains("hidden-response"));
    }

    #[tokio::test]
    async fn handler_error_is_logged_and_returned_unchanged() {
        let capture = EventCapture::default();
        let handler = StructuredLogger::new()
            .with_dispatch(capture.dispatch())
            .wrap(Handler::new(|_ctx, _req| async {
                HandlerResult::Err("upstream timed out".into())
            }));

        let err = handler.call(Context::new(), request()).await.unwrap_err();
        assert_eq!(err.to_string(), "upstream timed out");

        let events = capture.events();
        assert_eq!(events.len(), 2);

        let failed = &events[1];
        assert_eq!(failed.level, Level::ERROR);
        assert_eq!(failed.message(), "request processing failed");
        assert_eq!(failed.field("error"), "upstream timed out");
        assert_eq!(failed.field("bodySize"), "0");
        assert!(failed.fields.contains_key("duration"));
    }

    #[tokio::test]
    async fn logs_to_current_subscriber_by_default() {
        let capture = EventCapture::default();
        let _guard = tracing::dispatcher::set_default(&capture.dispatch());

        let handler = StructuredLogger::new().wrap(ok_handler("{}"));
        handler.call(Context::new(), request()).await.unwrap();

        let messages: Vec<String> = capture
            .events()
            .iter()
            .map(|event| event.message().to_string())
            .collect();
        assert_eq!(messages, vec!["request received", "request processed successfully"]);
    }

    #[tokio::test]
    async fn rejection_responses_are_logged_as_success() {
        let capture = EventCapture::default();
        let handler = StructuredLogger::new()
            .with_dispatch(capture.dispatch())
            .wrap(Handler::new(|_ctx, _req| async {
                Ok(ProxyResponse::text(StatusCode::UNSUPPORTED_MEDIA_TYPE, "Unsupported Media Type"))
            }));

        let response = handler.call(Context::new(), request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let events = capture.events();
        assert_eq!(events[1].level, Level::INFO);
        assert!(events[1].field("response").contains("415"));
    }
}
