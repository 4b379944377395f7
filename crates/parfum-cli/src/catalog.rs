//! Catalogue browsing commands.

use chrono::Utc;
use clap::Subcommand;
use parfum_core::products::category_name;
use parfum_core::{quote_variant, Product, SaleStatus};
use parfum_gateway::StorefrontGateway;

use crate::shop::Shop;

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// List active products with their current price
    Products {
        /// Only products in this category (by id)
        #[arg(long)]
        category: Option<String>,

        /// Case-insensitive match on name or brand
        #[arg(long)]
        search: Option<String>,

        /// Hide products with no stock left
        #[arg(long)]
        in_stock: bool,
    },
    /// List product categories
    Categories,
    /// List sales that are live right now
    Sales,
    /// Show one product with its notes and every size
    Show {
        /// Product id
        product_id: String,
    },
}

/// Browse filters applied to the product list.
#[derive(Debug, Default)]
pub(crate) struct ProductFilter<'a> {
    pub(crate) category: Option<&'a str>,
    pub(crate) search: Option<&'a str>,
    pub(crate) in_stock_only: bool,
}

impl ProductFilter<'_> {
    pub(crate) fn matches(&self, product: &Product) -> bool {
        if let Some(category) = self.category {
            if product.category_id.as_deref() != Some(category) {
                return false;
            }
        }
        if let Some(search) = self.search {
            let needle = search.trim().to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.brand.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        !self.in_stock_only || product.in_stock()
    }
}

pub(crate) async fn run_catalog_products(
    shop: &Shop,
    filter: &ProductFilter<'_>,
) -> anyhow::Result<()> {
    let (products, sales) = futures::try_join!(
        shop.gateway.list_public_products(),
        shop.gateway.list_sales()
    )?;
    let wishlist = shop.wishlist();

    let shown: Vec<&Product> = products.iter().filter(|p| filter.matches(p)).collect();
    if shown.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    println!(
        "  {:<38} {:<28} {:<18} {:<8} {:>14} {:>6}",
        "ID", "NAME", "BRAND", "SIZE", "PRICE", "SAVE"
    );
    for product in shown {
        let marker = if wishlist.contains(&product.id) { "*" } else { " " };
        let Some(variant) = product.default_variant() else {
            println!(
                "{marker} {:<38} {:<28} {:<18} {:<8} {:>14} {:>6}",
                product.id, product.name, product.brand, "-", "-", ""
            );
            continue;
        };
        let quote = quote_variant(product, variant, &sales);
        let save = if quote.is_discounted() {
            format!("-{}%", quote.savings_percent)
        } else {
            String::new()
        };
        let size = if variant.in_stock() {
            variant.size.clone()
        } else {
            format!("{} (out)", variant.size)
        };
        println!(
            "{marker} {:<38} {:<28} {:<18} {:<8} {:>14} {:>6}",
            product.id,
            product.name,
            product.brand,
            size,
            shop.money(quote.effective_price),
            save
        );
    }
    Ok(())
}

pub(crate) async fn run_catalog_categories(shop: &Shop) -> anyhow::Result<()> {
    let categories = shop.gateway.list_categories().await?;
    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }
    println!("{:<38} {:<24} {:<24}", "ID", "NAME", "SLUG");
    for category in &categories {
        println!(
            "{:<38} {:<24} {:<24}",
            category.id,
            category.name,
            category.slug.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub(crate) async fn run_catalog_sales(shop: &Shop) -> anyhow::Result<()> {
    let sales = shop.gateway.list_sales().await?;
    let now = Utc::now();
    let live: Vec<_> = sales
        .iter()
        .filter(|s| s.status_at(now) == SaleStatus::Live)
        .collect();
    if live.is_empty() {
        println!("No sales running.");
        return Ok(());
    }

    println!(
        "{:<28} {:<12} {:<20} {:<12}",
        "SALE", "DISCOUNT", "APPLIES TO", "ENDS"
    );
    for sale in live {
        let discount = match sale.discount_type {
            parfum_core::DiscountType::Percentage => format!("{}%", sale.discount_value),
            parfum_core::DiscountType::Fixed => shop.money(sale.discount_value),
        };
        let ends = if sale.is_permanent {
            "never".to_string()
        } else {
            sale.end_date
                .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
        };
        println!(
            "{:<28} {:<12} {:<20} {:<12}",
            sale.name, discount, sale.applies_to, ends
        );
    }
    Ok(())
}

pub(crate) async fn run_catalog_show(shop: &Shop, product_id: &str) -> anyhow::Result<()> {
    let (products, sales, categories) = futures::try_join!(
        shop.gateway.list_public_products(),
        shop.gateway.list_sales(),
        shop.gateway.list_categories()
    )?;
    let product = products
        .iter()
        .find(|p| p.id == product_id)
        .ok_or_else(|| anyhow::anyhow!("product '{product_id}' not found"))?;

    println!("{} by {}", product.name, product.brand);
    if let Some(category) = category_name(&categories, product.category_id.as_deref()) {
        println!("Category: {category}");
    }
    if let Some(rating) = product.rating {
        println!("Rating: {rating:.1} ({} reviews)", product.review_count);
    }
    if shop.wishlist().contains(&product.id) {
        println!("In your wishlist");
    }
    match shop.ratings().rating_for(&product.id).await {
        Ok(Some(mine)) => println!("Your rating: {mine}/5"),
        Ok(None) => {}
        Err(e) => tracing::warn!(product_id, error = %e, "could not load own rating"),
    }
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
    if !product.notes.is_empty() {
        println!();
        println!("Top:    {}", product.notes.top.join(", "));
        println!("Middle: {}", product.notes.middle.join(", "));
        println!("Base:   {}", product.notes.base.join(", "));
    }

    println!();
    println!(
        "{:<38} {:<10} {:>14} {:>14} {:>6}",
        "VARIANT", "SIZE", "PRICE", "WAS", "STOCK"
    );
    for variant in &product.variants {
        let quote = quote_variant(product, variant, &sales);
        let was = quote
            .original_price
            .map_or_else(String::new, |p| shop.money(p));
        println!(
            "{:<38} {:<10} {:>14} {:>14} {:>6}",
            variant.id,
            variant.size,
            shop.money(quote.effective_price),
            was,
            variant.stock
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use parfum_core::{FragranceNotes, Variant};
    use rust_decimal::Decimal;

    use super::*;

    fn product(name: &str, brand: &str, category: Option<&str>, stock: u32) -> Product {
        Product {
            id: name.to_lowercase(),
            name: name.to_string(),
            brand: brand.to_string(),
            description: None,
            category_id: category.map(str::to_string),
            notes: FragranceNotes::default(),
            images: Vec::new(),
            variants: vec![Variant {
                id: "v1".to_string(),
                size: "50ml".to_string(),
                price: Decimal::new(12_000, 2),
                stock,
                sku: None,
            }],
            rating: None,
            review_count: 0,
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ProductFilter::default();
        assert!(filter.matches(&product("Oud Noir", "Maison Oud", None, 0)));
    }

    #[test]
    fn category_filter_requires_exact_id() {
        let filter = ProductFilter {
            category: Some("c1"),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&product("Oud Noir", "Maison Oud", Some("c1"), 3)));
        assert!(!filter.matches(&product("Rose", "Maison Oud", Some("c2"), 3)));
        assert!(!filter.matches(&product("Musk", "Maison Oud", None, 3)));
    }

    #[test]
    fn search_matches_name_or_brand_ignoring_case() {
        let filter = ProductFilter {
            search: Some(" maison "),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&product("Oud Noir", "Maison Oud", None, 3)));

        let filter = ProductFilter {
            search: Some("NOIR"),
            ..ProductFilter::default()
        };
        assert!(filter.matches(&product("Oud Noir", "Other", None, 3)));
        assert!(!filter.matches(&product("Rose", "Other", None, 3)));
    }

    #[test]
    fn in_stock_filter_hides_sold_out() {
        let filter = ProductFilter {
            in_stock_only: true,
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product("Oud Noir", "Maison Oud", None, 0)));
        assert!(filter.matches(&product("Rose", "Maison Oud", None, 1)));
    }
}
