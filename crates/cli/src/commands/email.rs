//! Email preview command.

use tracing::info;

use smoochiie_core::Email;
use smoochiie_storefront::services::order_confirmation;

/// Render the order confirmation and log it without sending anything.
///
/// # Errors
///
/// Returns an error if the recipient is malformed or a template fails.
pub fn preview(
    order_id: &str,
    to: &str,
    store_name: &str,
    html: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let email = order_confirmation(Email::parse(to)?, order_id, store_name)?;

    info!(to = %email.to, from = %store_name, subject = %email.subject, "Order confirmation");
    let body = if html {
        &email.html_body
    } else {
        &email.text_body
    };
    info!("\n{body}");
    Ok(())
}
