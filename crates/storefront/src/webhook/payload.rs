//! PayPal webhook payload.
//!
//! PayPal's event envelope is loosely shaped and varies by API version, so
//! every field is optional and decoding is lenient: a field of the wrong JSON
//! type reads as absent instead of failing the whole event.

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use smoochiie_core::Email;

/// Order id used when the event carries none.
pub const UNKNOWN_ORDER_ID: &str = "N/A";

/// The event types this service reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PaymentCaptureCompleted,
    Other(String),
}

impl EventKind {
    pub const PAYMENT_CAPTURE_COMPLETED: &'static str = "PAYMENT.CAPTURE.COMPLETED";

    #[must_use]
    pub fn parse(event_type: &str) -> Self {
        if event_type == Self::PAYMENT_CAPTURE_COMPLETED {
            Self::PaymentCaptureCompleted
        } else {
            Self::Other(event_type.to_owned())
        }
    }
}

/// Top-level webhook envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookEvent {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub event_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub resource: Option<CaptureResource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureResource {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub payer: Option<Payer>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub supplementary_data: Option<SupplementaryData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Payer {
    #[serde(default, deserialize_with = "lenient::text")]
    pub email_address: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub payer_info: Option<PayerInfo>,
}

/// Legacy (v1) payer block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayerInfo {
    #[serde(default, deserialize_with = "lenient::text")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplementaryData {
    #[serde(default, deserialize_with = "lenient::object")]
    pub related_ids: Option<RelatedIds>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelatedIds {
    #[serde(default, deserialize_with = "lenient::identifier")]
    pub order_id: Option<String>,
}

/// Places an order id is read from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderIdSource {
    /// `resource.supplementary_data.related_ids.order_id`
    RelatedOrderId,
    /// `resource.id` (the capture id)
    ResourceId,
}

impl OrderIdSource {
    pub const FALLBACK: [Self; 2] = [Self::RelatedOrderId, Self::ResourceId];

    fn read(self, resource: &CaptureResource) -> Option<&str> {
        match self {
            Self::RelatedOrderId => resource
                .supplementary_data
                .as_ref()?
                .related_ids
                .as_ref()?
                .order_id
                .as_deref(),
            Self::ResourceId => resource.id.as_deref(),
        }
    }
}

/// Places a payer email is read from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayerEmailSource {
    /// `resource.payer.email_address`
    EmailAddress,
    /// `resource.payer.email`
    Email,
    /// `resource.payer.payer_info.email`
    PayerInfo,
}

impl PayerEmailSource {
    pub const FALLBACK: [Self; 3] = [Self::EmailAddress, Self::Email, Self::PayerInfo];

    fn read(self, payer: &Payer) -> Option<&str> {
        match self {
            Self::EmailAddress => payer.email_address.as_deref(),
            Self::Email => payer.email.as_deref(),
            Self::PayerInfo => payer.payer_info.as_ref()?.email.as_deref(),
        }
    }
}

impl WebhookEvent {
    /// Decode a request body.
    ///
    /// An empty (or whitespace-only) body reads as `{}`. Well-formed JSON that
    /// is not an object reads as an event with no fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON.
    pub fn parse(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        Ok(match serde_json::from_slice(body)? {
            value @ Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        })
    }

    /// The event type, if present and non-empty.
    #[must_use]
    pub fn kind(&self) -> Option<EventKind> {
        self.event_type.as_deref().map(EventKind::parse)
    }

    /// First order id found along [`OrderIdSource::FALLBACK`], else `"N/A"`.
    #[must_use]
    pub fn order_id(&self) -> &str {
        self.resource
            .as_ref()
            .and_then(|resource| {
                OrderIdSource::FALLBACK
                    .iter()
                    .find_map(|source| source.read(resource))
            })
            .unwrap_or(UNKNOWN_ORDER_ID)
    }

    /// First well-formed payer email along [`PayerEmailSource::FALLBACK`].
    #[must_use]
    pub fn payer_email(&self) -> Option<Email> {
        let payer = self.resource.as_ref()?.payer.as_ref()?;
        PayerEmailSource::FALLBACK
            .iter()
            .filter_map(|source| source.read(payer))
            .find_map(|candidate| Email::parse(candidate).ok())
    }
}

/// Field deserializers that map unexpected JSON types to `None`.
mod lenient {
    use super::{Deserialize, DeserializeOwned, Deserializer, Value};

    /// Non-empty string.
    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
    }

    /// Non-empty string, or a number rendered as text.
    pub fn identifier<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) if !s.trim().is_empty() => Some(s),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Nested object; anything else reads as absent.
    pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(match Value::deserialize(deserializer)? {
            value @ Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        })
    }
}
