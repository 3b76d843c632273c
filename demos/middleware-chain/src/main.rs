//! Middleware Chain Example for lambda-chain
//!
//! This example demonstrates:
//! - Composing built-in middleware with `Chain`
//! - Request ID propagation
//! - Content-Type gating with a custom error body
//! - Structured request/response logging
//! - Body decoding and validation (JSON, XML, base64)
//! - A hand-written middleware built with `Middleware::from_fn`
//!
//! Run with: cargo run -p middleware-chain
//! Set `RUST_LOG=debug` to also see why requests are rejected.

use lambda_chain::prelude::*;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// ============================================
// Request model
// ============================================

#[derive(Debug, Deserialize, Validate)]
struct CreateUser {
    #[validate(length(min = 1))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(range(min = 0, max = 130))]
    age: i32,
}

// ============================================
// Custom Middleware
// ============================================

/// Adds an `X-Elapsed-Micros` header to every successful response
fn timing() -> Middleware {
    Middleware::from_fn(|next: Handler| {
        Handler::new(move |ctx, req| {
            let next = next.clone();
            async move {
                let start = Instant::now();
                let response = next.call(ctx, req).await?;
                Ok(response.with_header("X-Elapsed-Micros", start.elapsed().as_micros().to_string()))
            }
        })
    })
}

// ============================================
// Handler
// ============================================

async fn create_user(ctx: Context, _req: ProxyRequest) -> HandlerResult {
    let request_id = request_id(&ctx);
    let user = validated::<CreateUser>(&ctx).ok_or("validated body missing from context")?;

    info!(request_id, name = %user.name, "creating user");

    let body = serde_json::json!({
        "message": "Request processed successfully",
        "requestID": request_id,
        "user": { "name": user.name, "email": user.email, "age": user.age },
    });
    Ok(ProxyResponse::json(StatusCode::OK, body.to_string()))
}

// ============================================
// Sample requests
// ============================================

enum Body {
    Text(&'static str),
    Base64(&'static str),
}

fn sample(content_type: Option<&str>, request_id: &str, body: Body) -> ProxyRequest {
    let mut req = ProxyRequest::new("POST", "/users").with_request_id(request_id);
    if let Some(ct) = content_type {
        req = req.with_header("Content-Type", ct);
    }
    match body {
        Body::Text(text) => req.with_body(text),
        Body::Base64(encoded) => req.with_base64_body(encoded),
    }
}

fn samples() -> Vec<(&'static str, ProxyRequest)> {
    let valid = Body::Text(r#"{"name":"Ada","email":"ada@example.com","age":36}"#);

    vec![
        (
            "Allowed Content-Type",
            sample(Some("application/json; charset=utf-8"), "sample-req-id-1", valid),
        ),
        (
            "Disallowed Content-Type",
            sample(Some("text/plain"), "sample-req-id-2", Body::Text("plain text data")),
        ),
        (
            "Missing Content-Type",
            sample(None, "sample-req-id-3", Body::Text(r#"{"data": "sample"}"#)),
        ),
        (
            "Invalid Body",
            sample(
                Some("application/json"),
                "sample-req-id-4",
                Body::Text(r#"{"name":"","email":"not-an-email","age":200}"#),
            ),
        ),
        (
            "XML Body",
            sample(
                Some("application/xml"),
                "sample-req-id-5",
                Body::Text("<CreateUser><name>Alan</name><email>alan@example.com</email><age>41</age></CreateUser>"),
            ),
        ),
        (
            "Base64 Body",
            sample(
                Some("application/json"),
                "sample-req-id-6",
                Body::Base64("eyJuYW1lIjoiR3JhY2UiLCJlbWFpbCI6ImdyYWNlQGV4YW1wbGUuY29tIiwiYWdlIjo4NX0="),
            ),
        ),
    ]
}

// ============================================
// Main
// ============================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .init();

    // Execution order: logger → request id → content type → validate → timing → handler
    let handler = Chain::new()
        .then(StructuredLogger::new())
        .then(RequestIdLayer::new())
        .then(
            AllowContentTypeLayer::new(["application/json", "application/xml"])
                .with_response("application/json", r#"{"error":"Only JSON or XML is allowed"}"#),
        )
        .then(ValidateLayer::<CreateUser>::new())
        .then(timing())
        .handler(Handler::new(create_user));

    for (label, req) in samples() {
        println!("--- Running Sample Request ({label}) ---");
        match handler.call(Context::new(), req).await {
            Ok(response) => println!("Response ({label}): StatusCode={}, Body={}", response.status_code, response.body),
            Err(err) => println!("Error from handler ({label}): {err}"),
        }
        println!();
    }
}
