//! Catalog products.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A product from the static catalog or the remote product feed.
///
/// Products are immutable reference data. `sale_price` is supplied alongside
/// `original_price` and `discount_rate` and is never derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub original_price: Price,
    /// Fraction between 0 and 1.
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_rate: Decimal,
    pub sale_price: Price,
    /// Image URL.
    pub image: String,
    pub description: String,
}

impl Product {
    /// Whether a discount badge should be shown.
    #[must_use]
    pub fn has_discount(&self) -> bool {
        self.discount_rate > Decimal::ZERO
    }

    /// Discount rate as a whole percentage, e.g. `0.15` becomes `15`.
    #[must_use]
    pub fn discount_percent(&self) -> u32 {
        (self.discount_rate * Decimal::ONE_HUNDRED)
            .round()
            .to_u32()
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            id: ProductId::new(1),
            name: "Kimchi Fried Rice".to_string(),
            original_price: Price::won(10_000),
            discount_rate: Decimal::new(15, 2),
            sale_price: Price::won(8_500),
            image: "https://example.com/kimchi.jpg".to_string(),
            description: "Spicy and savory".to_string(),
        }
    }

    #[test]
    fn test_discount_percent() {
        let product = sample();
        assert!(product.has_discount());
        assert_eq!(product.discount_percent(), 15);
    }

    #[test]
    fn test_no_discount() {
        let product = Product {
            discount_rate: Decimal::ZERO,
            ..sample()
        };
        assert!(!product.has_discount());
        assert_eq!(product.discount_percent(), 0);
    }

    #[test]
    fn test_deserializes_camel_case_catalog_record() {
        let json = r#"{
            "id": 3,
            "name": "Tteokbokki",
            "originalPrice": 6000,
            "discountRate": 0.1,
            "salePrice": 5400,
            "image": "https://example.com/tteokbokki.jpg",
            "description": "Rice cakes in gochujang sauce"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(3));
        assert_eq!(product.sale_price, Price::won(5_400));
        assert_eq!(product.discount_percent(), 10);
    }

    #[test]
    fn test_serializes_prices_as_numbers() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["originalPrice"], serde_json::json!(10_000));
        assert_eq!(value["salePrice"], serde_json::json!(8_500));
        assert!(value["discountRate"].is_number());

        let back: Product = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample());
    }
}
