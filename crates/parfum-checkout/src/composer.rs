use chrono::{DateTime, Utc};
use parfum_core::{CartLineItem, CustomerInfo, OrderSummary, StorefrontProfile};
use parfum_gateway::StorefrontGateway;
use parfum_invoice::{format_amount, render_invoice};

use crate::error::CheckoutError;
use crate::message::{chat_link, order_message};

/// Result of a successful checkout handoff.
#[derive(Debug, Clone)]
pub struct ComposedOrder {
    pub summary: OrderSummary,
    pub invoice_pdf: Vec<u8>,
    pub invoice_url: String,
    pub message: String,
    /// `wa.me` link that opens the chat with `message` prefilled.
    pub chat_link: String,
}

/// Turns a cart snapshot and the checkout form into an uploaded invoice and
/// a chat deep link.
pub struct OrderComposer<'a, G: StorefrontGateway + ?Sized> {
    gateway: &'a G,
    profile: &'a StorefrontProfile,
}

impl<'a, G: StorefrontGateway + ?Sized> OrderComposer<'a, G> {
    pub fn new(gateway: &'a G, profile: &'a StorefrontProfile) -> Self {
        Self { gateway, profile }
    }

    /// Compose the order, stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`OrderComposer::compose_at`].
    pub async fn compose(
        &self,
        items: &[CartLineItem],
        customer: CustomerInfo,
    ) -> Result<ComposedOrder, CheckoutError> {
        self.compose_at(items, customer, Utc::now()).await
    }

    /// Validate, render, upload, then build the chat handoff.
    ///
    /// Nothing is rendered or uploaded unless validation passes. The caller's
    /// cart is never touched; clearing it after a successful handoff is the
    /// caller's job.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Validation`] for a blank name or phone, or an empty
    ///   cart.
    /// - [`CheckoutError::Gateway`] if the invoice upload fails.
    pub async fn compose_at(
        &self,
        items: &[CartLineItem],
        customer: CustomerInfo,
        placed_at: DateTime<Utc>,
    ) -> Result<ComposedOrder, CheckoutError> {
        let summary = OrderSummary::prepare(
            customer,
            items.to_vec(),
            &self.profile.order_prefix,
            placed_at,
        )?;

        let invoice_pdf = render_invoice(&summary, self.profile);
        let file_name = summary.invoice_file_name();
        let invoice_url = self
            .gateway
            .upload_invoice(&file_name, invoice_pdf.clone())
            .await?;

        let message = order_message(&summary, self.profile, &invoice_url);
        let chat_link = chat_link(&self.profile.whatsapp_digits(), &message);

        tracing::info!(
            order_id = %summary.order_id,
            items = summary.items.len(),
            total = %format_amount(summary.total),
            invoice = %file_name,
            "composed order"
        );

        Ok(ComposedOrder {
            summary,
            invoice_pdf,
            invoice_url,
            message,
            chat_link,
        })
    }
}
