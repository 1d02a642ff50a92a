//! Email service for order confirmations.
//!
//! Uses SMTP via lettre for delivery with Askama HTML and plain-text
//! templates. Handlers talk to the [`Mailer`] trait so tests can swap the
//! transport out.

use askama::Template;
use futures::future::BoxFuture;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use smoochiie_core::Email;
use thiserror::Error;

use crate::config::EmailConfig;
use crate::filters;

/// HTML template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.html")]
struct OrderConfirmationHtml<'a> {
    order_id: &'a str,
    store_name: &'a str,
}

/// Plain text template for the order confirmation email.
#[derive(Template)]
#[template(path = "email/order_confirmation.txt")]
struct OrderConfirmationText<'a> {
    order_id: &'a str,
    store_name: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A rendered message ready for a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: Email,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Subject line of the order confirmation.
#[must_use]
pub fn order_confirmation_subject(order_id: &str) -> String {
    format!("Order Confirmed! #{order_id}")
}

/// Render the order confirmation for `to`.
///
/// # Errors
///
/// Returns error if a template fails to render.
pub fn order_confirmation(
    to: Email,
    order_id: &str,
    store_name: &str,
) -> Result<OutgoingEmail, EmailError> {
    let html_body = OrderConfirmationHtml {
        order_id,
        store_name,
    }
    .render()?;
    let text_body = OrderConfirmationText {
        order_id,
        store_name,
    }
    .render()?;

    Ok(OutgoingEmail {
        to,
        subject: order_confirmation_subject(order_id),
        text_body,
        html_body,
    })
}

/// Delivers rendered email.
pub trait Mailer: Send + Sync {
    /// Send one message.
    fn send<'a>(&'a self, email: &'a OutgoingEmail) -> BoxFuture<'a, Result<(), EmailError>>;
}

/// SMTP delivery through lettre.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a new mailer from configuration.
    ///
    /// Port 465 connects with implicit TLS; any other port upgrades with
    /// STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns error if the relay cannot be configured or the sender address
    /// is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let builder = if config.implicit_tls() {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        };
        let transport = builder
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from: sender(config)?,
        })
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, EmailError> {
        let to = email
            .to
            .as_str()
            .parse()
            .map_err(|_| EmailError::InvalidAddress(email.to.to_string()))?;

        Ok(Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )?)
    }
}

impl Mailer for SmtpMailer {
    fn send<'a>(&'a self, email: &'a OutgoingEmail) -> BoxFuture<'a, Result<(), EmailError>> {
        Box::pin(async move {
            let message = self.build_message(email)?;
            self.transport.send(message).await?;

            tracing::info!(to = %email.to, subject = %email.subject, "Email sent successfully");
            Ok(())
        })
    }
}

/// `"<store name>" <from address>`
fn sender(config: &EmailConfig) -> Result<Mailbox, EmailError> {
    let address = config
        .from_address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(config.from_address.clone()))?;
    Ok(Mailbox::new(Some(config.store_name.clone()), address))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(from: &str) -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            smtp_username: "orders@example.com".to_string(),
            smtp_password: SecretString::from("pw"),
            from_address: from.to_string(),
            store_name: "Smoochiie™ Store".to_string(),
        }
    }

    #[test]
    fn test_order_confirmation_content() {
        let to = Email::parse("buyer@example.com").unwrap();
        let email = order_confirmation(to.clone(), "ORDER-42", "Smoochiie™ Store").unwrap();

        assert_eq!(email.to, to);
        assert_eq!(email.subject, "Order Confirmed! #ORDER-42");
        assert!(email.html_body.contains("Thank you for your purchase!"));
        assert!(email.html_body.contains("ORDER-42"));
        assert!(email.text_body.contains("Order ID: ORDER-42"));
    }

    #[test]
    fn test_order_id_is_escaped_in_html() {
        let to = Email::parse("buyer@example.com").unwrap();
        let email = order_confirmation(to, "<b>1</b>", "Shop").unwrap();
        assert!(!email.html_body.contains("<b>1</b>"));
    }

    #[test]
    fn test_sender_mailbox() {
        let mailbox = sender(&config("orders@example.com")).unwrap();
        assert_eq!(mailbox.name.as_deref(), Some("Smoochiie™ Store"));
        assert_eq!(mailbox.email.to_string(), "orders@example.com");

        assert!(matches!(
            sender(&config("not an address")),
            Err(EmailError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_smtp_message_is_multipart() {
        let mailer = SmtpMailer::new(&config("orders@example.com")).unwrap();
        let email = order_confirmation(
            Email::parse("buyer@example.com").unwrap(),
            "A1",
            "Smoochiie™ Store",
        )
        .unwrap();

        let message = mailer.build_message(&email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("To: buyer@example.com"));
    }
}
