//! Order models with generated order numbers and computed totals.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use urban_echo_core::{OrderId, OrderStatus, PaymentStatus, ProductId, UserId, VariantId};

/// Alphabet for the random order-number suffix (no easily-confused glyphs).
const ORDER_NUMBER_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Length of the random order-number suffix.
const ORDER_NUMBER_SUFFIX_LEN: usize = 6;

/// A placed order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Generated order number, e.g. `UE-20260830-7KQ2MX`.
    pub order_number: String,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub lines: Vec<OrderLine>,
}

/// An order line with a variant snapshot taken at purchase time.
///
/// The snapshot (size/color/SKU/unit price) is embedded so later catalog
/// edits never rewrite order history.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

/// Input for creating an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub lines: Vec<NewOrderLine>,
    pub shipping: Decimal,
    pub tax: Decimal,
}

/// Input for one order line.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub product_name: String,
    pub size: String,
    pub color: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl NewOrder {
    /// Sum of `quantity x unit_price` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| Decimal::from(l.quantity) * l.unit_price)
            .sum()
    }

    /// Order total: subtotal + shipping + tax.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.subtotal() + self.shipping + self.tax
    }
}

/// Generate a new order number: `UE-<YYYYMMDD>-<6 random chars>`.
///
/// Uniqueness is enforced by the database constraint; a collision within a
/// single day's keyspace (31^6) is retried by the repository.
#[must_use]
pub fn generate_order_number(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_NUMBER_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.random_range(0..ORDER_NUMBER_ALPHABET.len());
            char::from(ORDER_NUMBER_ALPHABET[idx])
        })
        .collect();
    format!("UE-{}-{}", now.format("%Y%m%d"), suffix)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_lines() -> Vec<NewOrderLine> {
        vec![
            NewOrderLine {
                product_id: ProductId::new(1),
                variant_id: VariantId::new(10),
                product_name: "Classic Tee".to_string(),
                size: "M".to_string(),
                color: "Black".to_string(),
                sku: "TEE-M-BLK".to_string(),
                quantity: 2,
                unit_price: Decimal::new(1999, 2),
            },
            NewOrderLine {
                product_id: ProductId::new(2),
                variant_id: VariantId::new(20),
                product_name: "Denim Jacket".to_string(),
                size: "L".to_string(),
                color: "Indigo".to_string(),
                sku: "JKT-L-IND".to_string(),
                quantity: 1,
                unit_price: Decimal::new(8999, 2),
            },
        ]
    }

    #[test]
    fn test_subtotal_and_total() {
        let order = NewOrder {
            user_id: UserId::new(1),
            lines: sample_lines(),
            shipping: Decimal::new(500, 2),
            tax: Decimal::new(1040, 2),
        };
        // 2 x 19.99 + 1 x 89.99 = 129.97
        assert_eq!(order.subtotal(), Decimal::new(12997, 2));
        // 129.97 + 5.00 + 10.40 = 145.37
        assert_eq!(order.total(), Decimal::new(14537, 2));
    }

    #[test]
    fn test_order_number_format() {
        let now = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        let number = generate_order_number(now);
        assert!(number.starts_with("UE-20260830-"));
        assert_eq!(number.len(), "UE-20260830-".len() + 6);
        let suffix = number.rsplit('-').next().unwrap();
        assert!(suffix.bytes().all(|b| ORDER_NUMBER_ALPHABET.contains(&b)));
    }
}
