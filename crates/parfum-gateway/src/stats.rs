use chrono::{DateTime, Utc};
use parfum_core::{Product, Sale, SaleStatus};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{DashboardStats, OrderRow};

/// Variants at or below this stock level count as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Reduce the raw collections to dashboard figures.
///
/// Cancelled orders are excluded from the order count, revenue and average.
/// Orders without a total contribute zero revenue.
#[must_use]
pub fn summarize(
    products: &[Product],
    sales: &[Sale],
    orders: &[OrderRow],
    page_visits: usize,
    now: DateTime<Utc>,
) -> DashboardStats {
    let variants = products.iter().flat_map(|p| p.variants.iter());
    let (total_variants, low_stock_variants, out_of_stock_variants) =
        variants.fold((0, 0, 0), |(total, low, out), v| {
            (
                total + 1,
                low + usize::from(v.stock <= LOW_STOCK_THRESHOLD),
                out + usize::from(v.stock == 0),
            )
        });

    let counted: Vec<&OrderRow> = orders.iter().filter(|o| !o.is_cancelled()).collect();
    let revenue: Decimal = counted.iter().filter_map(|o| o.total).sum();
    let average_order_value = if counted.is_empty() {
        Decimal::ZERO
    } else {
        (revenue / Decimal::from(counted.len()))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    };

    DashboardStats {
        total_products: products.len(),
        active_products: products.iter().filter(|p| p.is_active).count(),
        total_variants,
        low_stock_variants,
        out_of_stock_variants,
        live_sales: sales
            .iter()
            .filter(|s| s.status_at(now) == SaleStatus::Live)
            .count(),
        order_count: counted.len(),
        revenue,
        average_order_value,
        page_visits,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use parfum_core::{AppliesTo, DiscountType, FragranceNotes, Variant};

    use super::*;

    fn product(id: &str, active: bool, stocks: &[u32]) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            brand: "Maison Oud".to_string(),
            description: None,
            category_id: None,
            notes: FragranceNotes::default(),
            images: vec![],
            variants: stocks
                .iter()
                .enumerate()
                .map(|(i, stock)| Variant {
                    id: format!("{id}-v{i}"),
                    size: "50ml".to_string(),
                    price: Decimal::new(100, 0),
                    stock: *stock,
                    sku: None,
                })
                .collect(),
            rating: None,
            review_count: 0,
            is_active: active,
            created_at: None,
        }
    }

    fn order(id: &str, total: Option<i64>, status: &str) -> OrderRow {
        OrderRow {
            id: id.to_string(),
            total: total.map(|t| Decimal::new(t, 2)),
            status: Some(status.to_string()),
            created_at: None,
        }
    }

    fn sale(active: bool, end: Option<DateTime<Utc>>) -> Sale {
        Sale {
            id: "s".to_string(),
            name: "Sale".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: Decimal::new(10, 0),
            is_active: active,
            start_date: None,
            end_date: end,
            is_permanent: false,
            applies_to: AppliesTo::All,
            target_ids: vec![],
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    #[test]
    fn counts_products_and_stock_levels() {
        let products = vec![
            product("a", true, &[0, 3, 20]),
            product("b", false, &[5, 6]),
        ];
        let stats = summarize(&products, &[], &[], 0, now());
        assert_eq!(stats.total_products, 2);
        assert_eq!(stats.active_products, 1);
        assert_eq!(stats.total_variants, 5);
        assert_eq!(stats.low_stock_variants, 3);
        assert_eq!(stats.out_of_stock_variants, 1);
    }

    #[test]
    fn revenue_skips_cancelled_orders() {
        let orders = vec![
            order("o1", Some(10_000), "completed"),
            order("o2", Some(5_050), "pending"),
            order("o3", Some(99_900), "Cancelled"),
            order("o4", None, "pending"),
        ];
        let stats = summarize(&[], &[], &orders, 42, now());
        assert_eq!(stats.order_count, 3);
        assert_eq!(stats.revenue, Decimal::new(15_050, 2));
        assert_eq!(stats.average_order_value, Decimal::new(5_017, 2));
        assert_eq!(stats.page_visits, 42);
    }

    #[test]
    fn empty_collections_give_zeroes() {
        let stats = summarize(&[], &[], &[], 0, now());
        assert_eq!(stats.revenue, Decimal::ZERO);
        assert_eq!(stats.average_order_value, Decimal::ZERO);
        assert_eq!(stats.live_sales, 0);
    }

    #[test]
    fn only_live_sales_are_counted() {
        let expired = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let sales = vec![sale(true, None), sale(false, None), sale(true, Some(expired))];
        assert_eq!(summarize(&[], &sales, &[], 0, now()).live_sales, 1);
    }
}
