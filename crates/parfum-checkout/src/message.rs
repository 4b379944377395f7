//! Chat handoff text and the `wa.me` deep link that carries it.

use std::fmt::Write as _;

use parfum_core::{OrderSummary, StorefrontProfile};
use parfum_invoice::format_amount;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped in a URI component: alphanumerics and
/// `- _ . ! ~ * ' ( )`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode `text` for use as a single query value.
#[must_use]
pub fn encode_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// The order as a chat message for the storefront's WhatsApp number.
#[must_use]
pub fn order_message(
    summary: &OrderSummary,
    profile: &StorefrontProfile,
    invoice_url: &str,
) -> String {
    let customer = &summary.customer;
    let mut out = String::new();

    let _ = writeln!(out, "*New order {}*", summary.order_id);
    out.push('\n');
    let _ = writeln!(out, "Name: {}", customer.name);
    let _ = writeln!(out, "Phone: {}", customer.phone);
    if let Some(email) = &customer.email {
        let _ = writeln!(out, "Email: {email}");
    }
    if let Some(address) = &customer.address {
        let _ = writeln!(out, "Address: {address}");
    }

    out.push('\n');
    out.push_str("*Items*\n");
    for item in &summary.items {
        let _ = writeln!(out, "- {} ({}) x{}", item.name, item.size, item.quantity);
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "*Total: {} {}*",
        profile.currency_code,
        format_amount(summary.total)
    );
    if let Some(notes) = &customer.notes {
        let _ = writeln!(out, "Notes: {notes}");
    }

    out.push('\n');
    let _ = write!(out, "Invoice: {invoice_url}");
    out
}

/// `https://wa.me/{digits}?text={message}`.
#[must_use]
pub fn chat_link(phone_digits: &str, message: &str) -> String {
    format!(
        "https://wa.me/{phone_digits}?text={}",
        encode_component(message)
    )
}
