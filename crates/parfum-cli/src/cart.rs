//! Cart and wishlist commands.

use clap::Subcommand;
use parfum_core::{quote_variant, CartLineItem, CartStore, LocalStore};
use parfum_gateway::StorefrontGateway;

use crate::shop::Shop;

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Show the cart and its total
    Show,
    /// Add a product to the cart at its current price
    Add {
        /// Product id
        product_id: String,

        /// Variant id; defaults to the cheapest size in stock
        #[arg(long)]
        variant: Option<String>,

        /// Number of bottles to add
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Add one more of a cart line
    Inc {
        product_id: String,
        variant_id: String,
    },
    /// Take one off a cart line (never below one)
    Dec {
        product_id: String,
        variant_id: String,
    },
    /// Remove a cart line
    Remove {
        product_id: String,
        variant_id: String,
    },
    /// Empty the cart
    Clear,
}

/// Sub-commands available under `wishlist`.
#[derive(Debug, Subcommand)]
pub enum WishlistCommands {
    /// List saved products
    Show,
    /// Save or unsave a product
    Toggle {
        /// Product id
        product_id: String,
    },
}

pub(crate) fn print_cart<S: LocalStore>(shop: &Shop, cart: &CartStore<S>) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }
    println!(
        "{:<28} {:<10} {:>5} {:>14} {:>14}",
        "ITEM", "SIZE", "QTY", "UNIT", "LINE"
    );
    for line in cart.lines() {
        println!(
            "{:<28} {:<10} {:>5} {:>14} {:>14}",
            line.name,
            line.size,
            line.quantity,
            shop.money(line.unit_price),
            shop.money(line.line_total())
        );
    }
    println!();
    println!(
        "{} item(s), total {}",
        cart.item_count(),
        shop.money(cart.total())
    );
}

pub(crate) fn run_cart_show(shop: &Shop) {
    print_cart(shop, &shop.cart());
}

pub(crate) async fn run_cart_add(
    shop: &Shop,
    product_id: &str,
    variant_id: Option<&str>,
    quantity: u32,
) -> anyhow::Result<()> {
    let (products, sales) = futures::try_join!(
        shop.gateway.list_public_products(),
        shop.gateway.list_sales()
    )?;
    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| anyhow::anyhow!("product '{product_id}' not found"))?;
    let variant = match variant_id {
        Some(id) => product
            .variant(id)
            .ok_or_else(|| anyhow::anyhow!("product '{product_id}' has no variant '{id}'"))?,
        None => product
            .default_variant()
            .ok_or_else(|| anyhow::anyhow!("product '{product_id}' has no sizes"))?,
    };
    if !variant.in_stock() {
        anyhow::bail!("{} {} is out of stock", product.name, variant.size);
    }

    let quote = quote_variant(product, variant, &sales);
    let mut cart = shop.cart();
    cart.add_item(CartLineItem::from_quote(product, variant, &quote, quantity))?;
    tracing::info!(
        product_id,
        variant_id = %variant.id,
        quantity,
        unit_price = %quote.effective_price,
        "added to cart"
    );
    println!("Added {} ({}) x{quantity}.", product.name, variant.size);
    println!();
    print_cart(shop, &cart);
    Ok(())
}

pub(crate) fn run_cart_adjust(
    shop: &Shop,
    product_id: &str,
    variant_id: &str,
    delta: i32,
) -> anyhow::Result<()> {
    let mut cart = shop.cart();
    if cart.find(product_id, variant_id).is_none() {
        anyhow::bail!("no cart line for {product_id}/{variant_id}");
    }
    cart.update_quantity(product_id, variant_id, delta)?;
    print_cart(shop, &cart);
    Ok(())
}

pub(crate) fn run_cart_remove(
    shop: &Shop,
    product_id: &str,
    variant_id: &str,
) -> anyhow::Result<()> {
    let mut cart = shop.cart();
    cart.remove_item(product_id, variant_id)?;
    print_cart(shop, &cart);
    Ok(())
}

pub(crate) fn run_cart_clear(shop: &Shop) -> anyhow::Result<()> {
    shop.cart().clear()?;
    println!("Cart cleared.");
    Ok(())
}

pub(crate) async fn run_wishlist_show(shop: &Shop) -> anyhow::Result<()> {
    let wishlist = shop.wishlist();
    if wishlist.is_empty() {
        println!("Your wishlist is empty.");
        return Ok(());
    }
    let products = shop.gateway.list_public_products().await?;
    println!("{:<38} {:<28} {:<18}", "ID", "NAME", "BRAND");
    for id in wishlist.ids() {
        match products.iter().find(|p| &p.id == id) {
            Some(product) => println!("{:<38} {:<28} {:<18}", id, product.name, product.brand),
            None => println!("{id:<38} (no longer available)"),
        }
    }
    Ok(())
}

pub(crate) fn run_wishlist_toggle(shop: &Shop, product_id: &str) -> anyhow::Result<()> {
    let mut wishlist = shop.wishlist();
    if wishlist.toggle(product_id)? {
        println!("Saved {product_id} to your wishlist.");
    } else {
        println!("Removed {product_id} from your wishlist.");
    }
    Ok(())
}
