//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::services::{EmailError, Mailer, SmtpMailer};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and holds only configuration
/// and the outgoing mail transport; handlers keep no other shared state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Create application state delivering mail over SMTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay or sender address is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, EmailError> {
        let mailer = SmtpMailer::new(&config.email)?;
        Ok(Self::with_mailer(config, Arc::new(mailer)))
    }

    /// Create application state with any mail transport.
    #[must_use]
    pub fn with_mailer(config: StorefrontConfig, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, mailer }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the outgoing mail transport.
    #[must_use]
    pub fn mailer(&self) -> &dyn Mailer {
        self.inner.mailer.as_ref()
    }
}
