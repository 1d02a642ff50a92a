//! PayPal payment webhook.
//!
//! One event type matters: `PAYMENT.CAPTURE.COMPLETED`, answered by emailing
//! an order confirmation to the payer. Every other delivery is acknowledged
//! with a 200 so PayPal does not retry it.

pub mod payload;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

pub use payload::{EventKind, OrderIdSource, PayerEmailSource, UNKNOWN_ORDER_ID, WebhookEvent};

use crate::error::add_breadcrumb;
use crate::services::{EmailError, Mailer, order_confirmation};

/// How a delivery was handled. Every variant answers 200.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// No usable `event_type`; some PayPal test deliveries omit it.
    MissingEventType,
    /// An event type this service does not act on.
    Ignored(String),
    /// Capture without any usable payer address.
    NoPayerEmail { order_id: String },
    /// Confirmation sent.
    Sent { order_id: String },
}

impl WebhookOutcome {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::MissingEventType => "No event_type; ignored".to_string(),
            Self::Ignored(event_type) => format!("Event ignored: {event_type}"),
            Self::NoPayerEmail { .. } => "No payer email; skipped email send".to_string(),
            Self::Sent { .. } => "Webhook processed and confirmation email sent".to_string(),
        }
    }

    /// Whether a confirmation went out.
    #[must_use]
    pub const fn email_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

impl IntoResponse for WebhookOutcome {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.message()).into_response()
    }
}

/// Act on a decoded delivery.
///
/// # Errors
///
/// Returns an error if the confirmation cannot be rendered or sent.
pub async fn process(
    mailer: &dyn Mailer,
    store_name: &str,
    event: &WebhookEvent,
) -> Result<WebhookOutcome, EmailError> {
    let Some(kind) = event.kind() else {
        warn!(webhook_event_id = ?event.id, "Webhook without event_type");
        return Ok(WebhookOutcome::MissingEventType);
    };

    if let EventKind::Other(event_type) = kind {
        info!(event_type = %event_type, "Ignoring webhook event");
        return Ok(WebhookOutcome::Ignored(event_type));
    }

    let order_id = event.order_id().to_owned();
    info!(
        webhook_event_id = event.id.as_deref().unwrap_or("no-id"),
        order_id = %order_id,
        "PayPal capture received"
    );
    add_breadcrumb(
        "webhook",
        "PayPal capture received",
        Some(&[("order_id", order_id.as_str())]),
    );

    let Some(to) = event.payer_email() else {
        warn!(order_id = %order_id, "No payer email found for order");
        return Ok(WebhookOutcome::NoPayerEmail { order_id });
    };

    let email = order_confirmation(to, &order_id, store_name)?;
    mailer.send(&email).await?;

    info!(order_id = %order_id, to = %email.to, "Order confirmation sent");
    Ok(WebhookOutcome::Sent { order_id })
}
