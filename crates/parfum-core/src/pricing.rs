//! Sale selection and discounted price resolution.
//!
//! Pure functions only. The charged price of a cart line is fixed when the
//! line is added, from the quote computed here.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::products::{Product, Variant};
use crate::sales::{DiscountType, Sale};

/// Effective price of one variant after sale resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub effective_price: Decimal,
    /// Whole-number percentage saved, for display badges.
    pub savings_percent: u32,
    /// The undiscounted price; `None` when nothing was taken off.
    pub original_price: Option<Decimal>,
    /// Id of the sale that produced this quote, if one applied.
    pub sale_id: Option<String>,
}

impl PriceQuote {
    fn undiscounted(price: Decimal) -> Self {
        Self {
            effective_price: price,
            savings_percent: 0,
            original_price: None,
            sale_id: None,
        }
    }

    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.original_price.is_some()
    }
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn round_percent(value: Decimal) -> u32 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .to_u32()
        .unwrap_or(0)
}

/// Apply `sale` to `variant_price`.
///
/// An absent or inactive sale leaves the price untouched. Percentage sales
/// take `value`% off; fixed sales subtract `value`, never going below zero.
/// The savings percentage is rounded half away from zero and capped at 100.
#[must_use]
pub fn resolve_price(variant_price: Decimal, sale: Option<&Sale>) -> PriceQuote {
    let Some(sale) = sale.filter(|s| s.is_active) else {
        return PriceQuote::undiscounted(variant_price);
    };

    let (effective, savings_percent) = match sale.discount_type {
        DiscountType::Percentage => {
            let factor = Decimal::ONE - sale.discount_value / Decimal::ONE_HUNDRED;
            let effective = (variant_price * factor).max(Decimal::ZERO);
            (effective, round_percent(sale.discount_value))
        }
        DiscountType::Fixed => {
            let effective = (variant_price - sale.discount_value).max(Decimal::ZERO);
            let savings = if variant_price.is_zero() {
                0
            } else {
                round_percent(sale.discount_value / variant_price * Decimal::ONE_HUNDRED)
            };
            (effective, savings)
        }
    };

    let effective_price = round_money(effective);
    PriceQuote {
        effective_price,
        savings_percent,
        original_price: (effective_price < variant_price).then_some(variant_price),
        sale_id: Some(sale.id.clone()),
    }
}

/// The sale that prices `product`: the first active sale, in list order,
/// whose targeting covers it.
///
/// The backend lists sales newest first, so the most recently created match
/// wins. There is deliberately no priority rule beyond that order.
#[must_use]
pub fn find_applicable_sale<'a>(sales: &'a [Sale], product: &Product) -> Option<&'a Sale> {
    sales
        .iter()
        .find(|sale| sale.is_active && sale.applies_to_product(product))
}

/// Quote `variant` of `product` against the current sale list.
#[must_use]
pub fn quote_variant(product: &Product, variant: &Variant, sales: &[Sale]) -> PriceQuote {
    resolve_price(variant.price, find_applicable_sale(sales, product))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::FragranceNotes;
    use crate::sales::AppliesTo;

    fn sale(id: &str, discount_type: DiscountType, value: i64) -> Sale {
        Sale {
            id: id.to_string(),
            name: format!("sale {id}"),
            discount_type,
            discount_value: Decimal::new(value, 0),
            is_active: true,
            start_date: None,
            end_date: None,
            is_permanent: true,
            applies_to: AppliesTo::All,
            target_ids: vec![],
        }
    }

    fn product(id: &str, category: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: "Oud Noir".to_string(),
            brand: "Maison Oud".to_string(),
            description: None,
            category_id: Some(category.to_string()),
            notes: FragranceNotes::default(),
            images: vec![],
            variants: vec![Variant {
                id: "v50".to_string(),
                size: "50ml".to_string(),
                price: Decimal::new(price, 0),
                stock: 5,
                sku: None,
            }],
            rating: None,
            review_count: 0,
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn no_sale_keeps_price() {
        let quote = resolve_price(Decimal::new(10000, 2), None);
        assert_eq!(quote.effective_price, Decimal::new(10000, 2));
        assert_eq!(quote.savings_percent, 0);
        assert!(!quote.is_discounted());
        assert!(quote.sale_id.is_none());
    }

    #[test]
    fn inactive_sale_keeps_price() {
        let mut s = sale("s1", DiscountType::Percentage, 20);
        s.is_active = false;
        let quote = resolve_price(Decimal::new(10000, 2), Some(&s));
        assert_eq!(quote.effective_price, Decimal::new(10000, 2));
        assert_eq!(quote.savings_percent, 0);
    }

    #[test]
    fn percentage_discount() {
        let s = sale("s1", DiscountType::Percentage, 20);
        let quote = resolve_price(Decimal::new(10000, 2), Some(&s));
        assert_eq!(quote.effective_price, Decimal::new(8000, 2));
        assert_eq!(quote.savings_percent, 20);
        assert_eq!(quote.original_price, Some(Decimal::new(10000, 2)));
        assert_eq!(quote.sale_id.as_deref(), Some("s1"));
    }

    #[test]
    fn fractional_percentage_rounds_for_display() {
        let mut s = sale("s1", DiscountType::Percentage, 0);
        s.discount_value = Decimal::new(125, 1);
        let quote = resolve_price(Decimal::new(8000, 2), Some(&s));
        assert_eq!(quote.effective_price, Decimal::new(7000, 2));
        assert_eq!(quote.savings_percent, 13);
    }

    #[test]
    fn fixed_discount() {
        let s = sale("s1", DiscountType::Fixed, 15);
        let quote = resolve_price(Decimal::new(5000, 2), Some(&s));
        assert_eq!(quote.effective_price, Decimal::new(3500, 2));
        assert_eq!(quote.savings_percent, 30);
    }

    #[test]
    fn fixed_discount_floors_at_zero() {
        let s = sale("s1", DiscountType::Fixed, 25);
        let quote = resolve_price(Decimal::new(1000, 2), Some(&s));
        assert_eq!(quote.effective_price, Decimal::ZERO);
        assert!(!quote.effective_price.is_sign_negative());
        assert_eq!(quote.savings_percent, 100);
    }

    #[test]
    fn fixed_discount_on_free_item_has_no_savings() {
        let s = sale("s1", DiscountType::Fixed, 5);
        let quote = resolve_price(Decimal::ZERO, Some(&s));
        assert_eq!(quote.effective_price, Decimal::ZERO);
        assert_eq!(quote.savings_percent, 0);
        assert!(!quote.is_discounted());
    }

    #[test]
    fn effective_price_rounds_to_cents() {
        let s = sale("s1", DiscountType::Percentage, 33);
        let quote = resolve_price(Decimal::new(1999, 2), Some(&s));
        // 19.99 * 0.67 = 13.3933
        assert_eq!(quote.effective_price, Decimal::new(1339, 2));
    }

    #[test]
    fn first_matching_sale_in_list_order_wins() {
        let mut newest = sale("newest", DiscountType::Percentage, 10);
        newest.applies_to = AppliesTo::SpecificCategories;
        newest.target_ids = vec!["woody".to_string()];
        let older = sale("older", DiscountType::Percentage, 50);

        let sales = vec![newest, older];
        let p = product("p1", "woody", 100);
        assert_eq!(
            find_applicable_sale(&sales, &p).map(|s| s.id.as_str()),
            Some("newest")
        );

        let other = product("p2", "floral", 100);
        assert_eq!(
            find_applicable_sale(&sales, &other).map(|s| s.id.as_str()),
            Some("older")
        );
    }

    #[test]
    fn inactive_sales_are_skipped_during_selection() {
        let mut first = sale("first", DiscountType::Percentage, 10);
        first.is_active = false;
        let second = sale("second", DiscountType::Fixed, 5);
        let sales = vec![first, second];
        let p = product("p1", "woody", 100);
        assert_eq!(
            find_applicable_sale(&sales, &p).map(|s| s.id.as_str()),
            Some("second")
        );
    }

    #[test]
    fn quote_variant_combines_selection_and_resolution() {
        let mut s = sale("s1", DiscountType::Percentage, 20);
        s.applies_to = AppliesTo::SpecificProducts;
        s.target_ids = vec!["p1".to_string()];
        let p = product("p1", "woody", 100);
        let quote = quote_variant(&p, &p.variants[0], &[s]);
        assert_eq!(quote.effective_price, Decimal::new(80, 0));
        assert_eq!(quote.savings_percent, 20);
    }

    #[test]
    fn quote_without_matching_sale_is_plain() {
        let mut s = sale("s1", DiscountType::Percentage, 20);
        s.applies_to = AppliesTo::SpecificProducts;
        s.target_ids = vec!["other".to_string()];
        let p = product("p1", "woody", 100);
        let quote = quote_variant(&p, &p.variants[0], &[s]);
        assert_eq!(quote, PriceQuote::undiscounted(Decimal::new(100, 0)));
    }
}
