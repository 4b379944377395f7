//! `checkout`: compose the order, keep a local copy of the invoice, and print
//! the chat link.

use std::path::{Path, PathBuf};

use parfum_checkout::OrderComposer;
use parfum_core::CustomerInfo;

use crate::shop::Shop;

/// Checkout form fields as given on the command line.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckoutArgs {
    /// Full name for the invoice
    #[arg(long)]
    pub name: String,

    /// Phone number the shop can reach you on
    #[arg(long)]
    pub phone: String,

    #[arg(long)]
    pub email: Option<String>,

    /// Delivery address
    #[arg(long)]
    pub address: Option<String>,

    /// Anything the shop should know
    #[arg(long)]
    pub notes: Option<String>,

    /// Directory to write a copy of the invoice PDF to
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

impl CheckoutArgs {
    pub(crate) fn customer(&self) -> CustomerInfo {
        CustomerInfo {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            notes: self.notes.clone(),
        }
    }
}

/// Compose the order from the current cart.
///
/// The cart is cleared only after the invoice is uploaded and the chat link
/// is built. Any failure leaves it untouched.
///
/// # Errors
///
/// Returns an error when the form is incomplete, the cart is empty, the
/// upload fails, or the local copy cannot be written.
pub(crate) async fn run_checkout(shop: &Shop, args: &CheckoutArgs) -> anyhow::Result<()> {
    let mut cart = shop.cart();
    let composer = OrderComposer::new(&shop.gateway, &shop.profile);
    let order = composer.compose(cart.lines(), args.customer()).await?;

    let save_dir = args
        .save_dir
        .clone()
        .unwrap_or_else(|| shop.config.data_dir.join("invoices"));
    let local = write_invoice_copy(
        &save_dir,
        &order.summary.invoice_file_name(),
        &order.invoice_pdf,
    );

    if let Err(e) = cart.clear() {
        tracing::warn!(
            order_id = %order.summary.order_id,
            error = %e,
            "order sent but cart not cleared"
        );
    }

    println!("Order {} ready.", order.summary.order_id);
    println!(
        "{} item(s), total {}",
        order.summary.item_count(),
        shop.money(order.summary.total.unwrap_or_default())
    );
    println!("Invoice: {}", order.invoice_url);
    match local {
        Ok(path) => println!("Saved a copy to {path}"),
        Err(e) => tracing::warn!(error = %e, "could not save local invoice copy"),
    }
    println!();
    println!("Open this link to send the order on WhatsApp:");
    println!("{}", order.chat_link);
    Ok(())
}

fn write_invoice_copy(dir: &Path, file_name: &str, pdf: &[u8]) -> std::io::Result<String> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, pdf)?;
    Ok(path.display().to_string())
}
