//! External services used by the storefront.
//!
//! # Services
//!
//! - `email` - Order confirmation mail over SMTP

pub mod email;

pub use email::{EmailError, Mailer, OutgoingEmail, SmtpMailer, order_confirmation};
