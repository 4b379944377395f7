mod admin;
mod cart;
mod catalog;
mod checkout;
mod review;
mod shop;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use admin::AdminCommands;
use cart::{CartCommands, WishlistCommands};
use catalog::{CatalogCommands, ProductFilter};
use checkout::CheckoutArgs;
use review::ReviewCommands;
use shop::Shop;

#[derive(Debug, Parser)]
#[command(name = "parfum", about = "Parfum storefront command line")]
struct Cli {
    /// Skip the brand banner
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse products, categories, and sales
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Manage the local cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Manage saved products
    Wishlist {
        #[command(subcommand)]
        command: WishlistCommands,
    },
    /// Send the cart as an order over WhatsApp with a PDF invoice
    Checkout(CheckoutArgs),
    /// Rate products
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
    /// Store administration (requires a signed-in session)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

impl Commands {
    /// Storefront page a command stands in for, as recorded by the visit
    /// tracker. Cart, wishlist, review, and admin commands are not page views.
    fn storefront_page(&self) -> Option<String> {
        match self {
            Commands::Catalog { command } => Some(match command {
                CatalogCommands::Products { .. } => "/shop".to_string(),
                CatalogCommands::Categories => "/".to_string(),
                CatalogCommands::Sales => "/sales".to_string(),
                CatalogCommands::Show { product_id } => format!("/product/{product_id}"),
            }),
            Commands::Checkout(_) => Some("/checkout".to_string()),
            Commands::Cart { .. }
            | Commands::Wishlist { .. }
            | Commands::Review { .. }
            | Commands::Admin { .. } => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = parfum_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        println!("parfum: use --help to list commands");
        return Ok(());
    };

    let shop = Shop::open(config)?;
    if !cli.quiet {
        shop.show_intro();
    }
    if let Some(page) = command.storefront_page() {
        shop.visit(&page).await;
    }

    match command {
        Commands::Catalog { command } => match command {
            CatalogCommands::Products {
                category,
                search,
                in_stock,
            } => {
                let filter = ProductFilter {
                    category: category.as_deref(),
                    search: search.as_deref(),
                    in_stock_only: in_stock,
                };
                catalog::run_catalog_products(&shop, &filter).await?;
            }
            CatalogCommands::Categories => catalog::run_catalog_categories(&shop).await?,
            CatalogCommands::Sales => catalog::run_catalog_sales(&shop).await?,
            CatalogCommands::Show { product_id } => {
                catalog::run_catalog_show(&shop, &product_id).await?;
            }
        },
        Commands::Cart { command } => match command {
            CartCommands::Show => cart::run_cart_show(&shop),
            CartCommands::Add {
                product_id,
                variant,
                qty,
            } => cart::run_cart_add(&shop, &product_id, variant.as_deref(), qty).await?,
            CartCommands::Inc {
                product_id,
                variant_id,
            } => cart::run_cart_adjust(&shop, &product_id, &variant_id, 1)?,
            CartCommands::Dec {
                product_id,
                variant_id,
            } => cart::run_cart_adjust(&shop, &product_id, &variant_id, -1)?,
            CartCommands::Remove {
                product_id,
                variant_id,
            } => cart::run_cart_remove(&shop, &product_id, &variant_id)?,
            CartCommands::Clear => cart::run_cart_clear(&shop)?,
        },
        Commands::Wishlist { command } => match command {
            WishlistCommands::Show => cart::run_wishlist_show(&shop).await?,
            WishlistCommands::Toggle { product_id } => {
                cart::run_wishlist_toggle(&shop, &product_id)?;
            }
        },
        Commands::Checkout(args) => checkout::run_checkout(&shop, &args).await?,
        Commands::Review { command } => match command {
            ReviewCommands::Rate { product_id, rating } => {
                review::run_review_rate(&shop, &product_id, rating).await?;
            }
            ReviewCommands::Show { product_id } => {
                review::run_review_show(&shop, &product_id).await?;
            }
        },
        Commands::Admin { command } => match command {
            AdminCommands::Stats => admin::run_admin_stats(&shop).await?,
            AdminCommands::Product { command } => {
                admin::run_admin_product(&shop, &command).await?;
            }
            AdminCommands::Sale { command } => admin::run_admin_sale(&shop, &command).await?,
            AdminCommands::UploadImage { path } => {
                admin::run_admin_upload_image(&shop, &path).await?;
            }
        },
    }

    Ok(())
}
