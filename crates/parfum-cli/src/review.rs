use clap::Subcommand;
use parfum_gateway::RatingScope;

use crate::shop::Shop;

/// Sub-commands available under `review`.
#[derive(Debug, Subcommand)]
pub enum ReviewCommands {
    /// Rate a product from 1 to 5
    Rate {
        /// Product id
        product_id: String,

        /// Stars, 1 to 5
        rating: u8,
    },
    /// Show your rating for a product
    Show {
        /// Product id
        product_id: String,
    },
}

pub(crate) async fn run_review_rate(
    shop: &Shop,
    product_id: &str,
    rating: u8,
) -> anyhow::Result<()> {
    match shop.ratings().rate(product_id, rating).await? {
        RatingScope::Account => println!("Rated {product_id} {rating}/5."),
        RatingScope::Guest => {
            println!("Rated {product_id} {rating}/5 on this device. Sign in to share it.");
        }
    }
    Ok(())
}

pub(crate) async fn run_review_show(shop: &Shop, product_id: &str) -> anyhow::Result<()> {
    match shop.ratings().rating_for(product_id).await? {
        Some(rating) => println!("You rated {product_id} {rating}/5."),
        None => println!("You have not rated {product_id}."),
    }
    Ok(())
}
