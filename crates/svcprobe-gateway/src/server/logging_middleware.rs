//! HTTP Request/Response Logging Middleware
//!
//! One entry and one exit line per request, correlated by trace id.

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::Instrument;

use crate::logging::{RequestSpan, TraceContext};

/// Logging middleware for requests and responses
pub async fn http_logging_middleware(mut request: Request, next: Next) -> Response {
    let ctx = TraceContext::new(request.method().as_str(), request.uri().path());
    let span = RequestSpan::enter(&ctx);

    request.extensions_mut().insert(ctx.clone());

    async move {
        RequestSpan::log_entry(&ctx);
        let response = next.run(request).await;
        RequestSpan::log_exit(&ctx, response.status().as_u16());
        response
    }
    .instrument(span)
    .await
}
