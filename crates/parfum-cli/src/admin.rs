//! Admin commands. Everything here needs a signed-in backend session.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Subcommand;
use parfum_gateway::{ProductDraft, SaleDraft, StorefrontGateway};
use serde::de::DeserializeOwned;

use crate::shop::Shop;

/// Sub-commands available under `admin`.
#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Show dashboard figures
    Stats,
    /// Manage products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage sales
    Sale {
        #[command(subcommand)]
        command: SaleCommands,
    },
    /// Upload a product image and print its public URL
    UploadImage {
        /// Path to a JPEG, PNG, WebP or GIF file
        path: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// Create a product from a JSON draft
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a product's fields from a JSON draft
    Update {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    Delete {
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SaleCommands {
    /// List every sale with its current status
    List,
    /// Create a sale from a JSON draft
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a sale's fields from a JSON draft
    Update {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },
    Delete {
        id: String,
    },
}

fn read_draft<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("invalid draft {}: {e}", path.display()))
}

pub(crate) fn image_content_type(path: &Path) -> anyhow::Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "webp" => Ok("image/webp"),
        "gif" => Ok("image/gif"),
        _ => anyhow::bail!("unsupported image type: {}", path.display()),
    }
}

pub(crate) async fn run_admin_stats(shop: &Shop) -> anyhow::Result<()> {
    let stats = shop.gateway.get_dashboard_stats().await?;
    println!("{:<24} {:>12}", "Products", stats.total_products);
    println!("{:<24} {:>12}", "  active", stats.active_products);
    println!("{:<24} {:>12}", "Variants", stats.total_variants);
    println!("{:<24} {:>12}", "  low stock", stats.low_stock_variants);
    println!("{:<24} {:>12}", "  out of stock", stats.out_of_stock_variants);
    println!("{:<24} {:>12}", "Live sales", stats.live_sales);
    println!("{:<24} {:>12}", "Orders", stats.order_count);
    println!("{:<24} {:>12}", "Revenue", shop.money(stats.revenue));
    println!(
        "{:<24} {:>12}",
        "Average order",
        shop.money(stats.average_order_value)
    );
    println!("{:<24} {:>12}", "Page visits", stats.page_visits);
    Ok(())
}

pub(crate) async fn run_admin_product(
    shop: &Shop,
    command: &ProductCommands,
) -> anyhow::Result<()> {
    match command {
        ProductCommands::Create { file } => {
            let draft: ProductDraft = read_draft(file)?;
            let product = shop.gateway.create_product(&draft).await?;
            println!("Created product {} ({}).", product.id, product.name);
        }
        ProductCommands::Update { id, file } => {
            let draft: ProductDraft = read_draft(file)?;
            let product = shop.gateway.update_product(id, &draft).await?;
            println!("Updated product {} ({}).", product.id, product.name);
        }
        ProductCommands::Delete { id } => {
            shop.gateway.delete_product(id).await?;
            println!("Deleted product {id}.");
        }
    }
    Ok(())
}

pub(crate) async fn run_admin_sale(shop: &Shop, command: &SaleCommands) -> anyhow::Result<()> {
    match command {
        SaleCommands::List => {
            let sales = shop.gateway.list_sales().await?;
            let now = Utc::now();
            println!(
                "{:<38} {:<28} {:<10} {:>10} {:<20}",
                "ID", "NAME", "STATUS", "VALUE", "APPLIES TO"
            );
            for sale in &sales {
                println!(
                    "{:<38} {:<28} {:<10} {:>10} {:<20}",
                    sale.id,
                    sale.name,
                    sale.status_at(now),
                    sale.discount_value,
                    sale.applies_to
                );
            }
        }
        SaleCommands::Create { file } => {
            let draft: SaleDraft = read_draft(file)?;
            let sale = shop.gateway.create_sale(&draft).await?;
            println!("Created sale {} ({}).", sale.id, sale.name);
        }
        SaleCommands::Update { id, file } => {
            let draft: SaleDraft = read_draft(file)?;
            let sale = shop.gateway.update_sale(id, &draft).await?;
            println!("Updated sale {} ({}).", sale.id, sale.name);
        }
        SaleCommands::Delete { id } => {
            shop.gateway.delete_sale(id).await?;
            println!("Deleted sale {id}.");
        }
    }
    Ok(())
}

pub(crate) async fn run_admin_upload_image(shop: &Shop, path: &Path) -> anyhow::Result<()> {
    let content_type = image_content_type(path)?;
    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let file_name = format!(
        "{}-{}",
        Utc::now().timestamp_millis(),
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
    );
    let url = shop.gateway.upload_image(&file_name, bytes, content_type).await?;
    println!("{url}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(image_content_type(Path::new("a/b.JPG")).unwrap(), "image/jpeg");
        assert_eq!(image_content_type(Path::new("b.jpeg")).unwrap(), "image/jpeg");
        assert_eq!(image_content_type(Path::new("b.png")).unwrap(), "image/png");
        assert_eq!(image_content_type(Path::new("b.webp")).unwrap(), "image/webp");
        assert!(image_content_type(Path::new("b.pdf")).is_err());
        assert!(image_content_type(Path::new("noext")).is_err());
    }

    #[test]
    fn reads_sale_draft_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "name": "Eid",
                "discount_type": "percentage",
                "discount_value": 20,
                "is_active": true,
                "start_date": null,
                "end_date": null,
                "applies_to": "all"
            }}"#
        )
        .unwrap();

        let draft: SaleDraft = read_draft(file.path()).unwrap();
        assert_eq!(draft.name, "Eid");
        assert!(draft.target_ids.is_empty());
        assert!(!draft.is_permanent);
    }

    #[test]
    fn sale_draft_accepts_null_targets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "name": "Eid",
                "discount_type": "fixed",
                "discount_value": 15,
                "is_active": true,
                "start_date": null,
                "end_date": null,
                "is_permanent": null,
                "applies_to": "all",
                "target_ids": null
            }}"#
        )
        .unwrap();

        let draft: SaleDraft = read_draft(file.path()).unwrap();
        assert!(draft.target_ids.is_empty());
        assert!(!draft.is_permanent);
    }

    #[test]
    fn bad_draft_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = read_draft::<ProductDraft>(file.path()).unwrap_err();
        assert!(err.to_string().contains("invalid draft"));
    }
}
