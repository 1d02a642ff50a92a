//! Integration tests for the Smoochiie shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p smoochiie-integration-tests
//! ```
//!
//! No sockets or SMTP servers are involved: the webhook app is driven with
//! `tower::ServiceExt::oneshot` and mail goes to an in-memory [`RecordingMailer`].
//!
//! # Test Categories
//!
//! - `webhook_http` - PayPal webhook over HTTP
//! - `cart_store` - Cart persistence, views and click handling
//! - `catalog_search` - Catalog filter and search modal

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Arc, Mutex, PoisonError};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use futures::future::BoxFuture;
use secrecy::SecretString;
use tower::ServiceExt;

use smoochiie_storefront::config::{DEFAULT_STORE_NAME, EmailConfig, StorefrontConfig};
use smoochiie_storefront::routes::{self, webhooks::PAYPAL_WEBHOOK_PATH};
use smoochiie_storefront::services::{EmailError, Mailer, OutgoingEmail};
use smoochiie_storefront::state::AppState;

/// Mailer that keeps every message instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    /// Messages sent so far, oldest first.
    #[must_use]
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Mailer for RecordingMailer {
    fn send<'a>(&'a self, email: &'a OutgoingEmail) -> BoxFuture<'a, Result<(), EmailError>> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(email.clone());
        Box::pin(async { Ok(()) })
    }
}

/// Mailer whose every send fails, as when the relay rejects the login.
#[derive(Debug, Default)]
pub struct FailingMailer;

impl Mailer for FailingMailer {
    fn send<'a>(&'a self, email: &'a OutgoingEmail) -> BoxFuture<'a, Result<(), EmailError>> {
        Box::pin(async move { Err(EmailError::InvalidAddress(email.to.to_string())) })
    }
}

/// Configuration pointing at a relay that is never contacted.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        email: EmailConfig {
            smtp_host: "smtp.invalid".to_string(),
            smtp_port: 465,
            smtp_username: "orders@smoochiie.test".to_string(),
            smtp_password: SecretString::from("unused"),
            from_address: "orders@smoochiie.test".to_string(),
            store_name: DEFAULT_STORE_NAME.to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A response reduced to what the tests look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

/// The storefront app wired to an in-memory mailer.
pub struct TestContext {
    pub app: Router,
    pub mailer: Arc<RecordingMailer>,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::with_mailer(test_config(), mailer.clone());
        Self {
            app: routes::app(state),
            mailer,
        }
    }

    /// An app whose mail delivery always fails.
    #[must_use]
    pub fn failing() -> Router {
        routes::app(AppState::with_mailer(test_config(), Arc::new(FailingMailer)))
    }

    /// POST `body` to the webhook.
    pub async fn post_webhook(&self, body: impl Into<Body>) -> TestResponse {
        self.request(Method::POST, PAYPAL_WEBHOOK_PATH, body.into())
            .await
    }

    /// Send a request with any method.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(&self, method: Method, uri: &str, body: Body) -> TestResponse {
        send(self.app.clone(), method, uri, body).await
    }

    /// Number of emails sent so far.
    #[must_use]
    pub fn emails_sent(&self) -> usize {
        self.mailer.sent().len()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Send one request through `app`.
///
/// # Panics
///
/// Panics if the request cannot be built or the body cannot be read.
#[allow(clippy::expect_used)]
pub async fn send(app: Router, method: Method, uri: &str, body: Body) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .expect("valid request");
    let response = app.oneshot(request).await.expect("infallible router");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body");

    TestResponse {
        status,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}
