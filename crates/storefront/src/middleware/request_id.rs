//! Request ID middleware for request tracing and correlation.
//!
//! Webhook deliveries carry PayPal's `paypal-transmission-id`, which is what
//! PayPal's dashboard shows for each delivery attempt, so that value is used
//! when present. Otherwise an upstream `x-request-id` is kept, and failing
//! both a UUID v4 is generated.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Delivery id PayPal attaches to every webhook request.
pub const PAYPAL_TRANSMISSION_ID_HEADER: &str = "paypal-transmission-id";

/// Incoming headers consulted for an id, in order.
const INCOMING_ID_HEADERS: [&str; 2] = [PAYPAL_TRANSMISSION_ID_HEADER, REQUEST_ID_HEADER];

/// Middleware that ensures every request has a request ID.
///
/// The request ID is recorded in the current span, tagged on the Sentry scope
/// and echoed in the `x-request-id` response header.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = INCOMING_ID_HEADERS
        .iter()
        .find_map(|name| {
            request
                .headers()
                .get(*name)
                .and_then(|h| h.to_str().ok())
                .filter(|v| !v.is_empty())
        })
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
