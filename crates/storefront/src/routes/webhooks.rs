//! PayPal webhook endpoint.

use axum::{Router, body::Bytes, extract::State, response::IntoResponse, routing::post};
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::state::AppState;
use crate::webhook::{self, WebhookEvent};

/// Path PayPal delivers events to.
pub const PAYPAL_WEBHOOK_PATH: &str = "/webhooks/paypal";

/// Create webhook routes.
///
/// Any method other than POST on the webhook path answers 405.
pub fn router() -> Router<AppState> {
    Router::new().route(
        PAYPAL_WEBHOOK_PATH,
        post(handle_paypal).fallback(method_not_allowed),
    )
}

/// Handle a PayPal webhook delivery.
#[instrument(skip(state, body))]
async fn handle_paypal(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let event = WebhookEvent::parse(&body)?;
    debug!(event_type = ?event.event_type, "PayPal webhook decoded");

    let outcome = webhook::process(
        state.mailer(),
        &state.config().email.store_name,
        &event,
    )
    .await?;

    Ok(outcome)
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
