use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top, heart and base accords of a fragrance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragranceNotes {
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub top: Vec<String>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub middle: Vec<String>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub base: Vec<String>,
}

impl FragranceNotes {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.top.is_empty() && self.middle.is_empty() && self.base.is_empty()
    }
}

/// A catalogue product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub notes: FragranceNotes,
    /// Ordered image URLs; the first one is the primary image.
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub variants: Vec<Variant>,
    pub rating: Option<Decimal>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub review_count: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Product {
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    #[must_use]
    pub fn variant(&self, variant_id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    /// Returns `true` if any variant has stock left.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.variants.iter().any(Variant::in_stock)
    }

    /// The variant shown by default on a product card: the cheapest one in
    /// stock, falling back to the cheapest overall.
    #[must_use]
    pub fn default_variant(&self) -> Option<&Variant> {
        self.variants
            .iter()
            .filter(|v| v.in_stock())
            .min_by_key(|v| v.price)
            .or_else(|| self.variants.iter().min_by_key(|v| v.price))
    }
}

/// A purchasable size of a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    /// Display size, e.g. `"50ml"`.
    pub size: String,
    pub price: Decimal,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub stock: u32,
    pub sku: Option<String>,
}

impl Variant {
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: Option<String>,
}

/// Look up a category name by id.
#[must_use]
pub fn category_name<'a>(categories: &'a [Category], id: Option<&str>) -> Option<&'a str> {
    let id = id?;
    categories
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variant(id: &str, price: i64, stock: u32) -> Variant {
        Variant {
            id: id.to_string(),
            size: format!("{id}ml"),
            price: Decimal::new(price, 0),
            stock,
            sku: None,
        }
    }

    fn product(variants: Vec<Variant>) -> Product {
        Product {
            id: "p1".to_string(),
            name: "Oud Noir".to_string(),
            brand: "Maison Oud".to_string(),
            description: None,
            category_id: Some("c1".to_string()),
            notes: FragranceNotes::default(),
            images: vec![
                "https://cdn.example/oud-1.jpg".to_string(),
                "https://cdn.example/oud-2.jpg".to_string(),
            ],
            variants,
            rating: None,
            review_count: 0,
            is_active: true,
            created_at: None,
        }
    }

    #[test]
    fn primary_image_is_first() {
        let p = product(vec![]);
        assert_eq!(p.primary_image(), Some("https://cdn.example/oud-1.jpg"));
    }

    #[test]
    fn default_variant_prefers_cheapest_in_stock() {
        let p = product(vec![variant("30", 40, 0), variant("50", 60, 3), variant("100", 90, 2)]);
        assert_eq!(p.default_variant().map(|v| v.id.as_str()), Some("50"));
    }

    #[test]
    fn default_variant_falls_back_to_cheapest_when_sold_out() {
        let p = product(vec![variant("100", 90, 0), variant("30", 40, 0)]);
        assert_eq!(p.default_variant().map(|v| v.id.as_str()), Some("30"));
        assert!(!p.in_stock());
    }

    #[test]
    fn default_variant_none_without_variants() {
        assert!(product(vec![]).default_variant().is_none());
    }

    #[test]
    fn variant_lookup_by_id() {
        let p = product(vec![variant("30", 40, 1), variant("50", 60, 1)]);
        assert_eq!(p.variant("50").map(|v| v.price), Some(Decimal::new(60, 0)));
        assert!(p.variant("75").is_none());
    }

    #[test]
    fn deserializes_backend_row_with_numeric_prices() {
        let json = serde_json::json!({
            "id": "p9",
            "name": "Rose Absolue",
            "brand": "Maison Oud",
            "description": null,
            "category_id": "floral",
            "notes": { "top": ["bergamot"], "base": ["musk"] },
            "images": [],
            "variants": [{ "id": "v1", "size": "50ml", "price": 79.5, "stock": 4, "sku": null }],
            "rating": 4.5,
            "created_at": "2026-01-02T03:04:05Z"
        });
        let p: Product = serde_json::from_value(json).unwrap();
        assert_eq!(p.variants[0].price, Decimal::new(795, 1));
        assert_eq!(p.notes.middle.len(), 0);
        assert_eq!(p.review_count, 0);
        assert!(p.is_active);
    }

    #[test]
    fn category_name_lookup() {
        let cats = vec![Category {
            id: "c1".to_string(),
            name: "Oriental".to_string(),
            slug: None,
        }];
        assert_eq!(category_name(&cats, Some("c1")), Some("Oriental"));
        assert_eq!(category_name(&cats, Some("c2")), None);
        assert_eq!(category_name(&cats, None), None);
    }
}
