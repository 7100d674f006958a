//! Cart and wishlist state containers.
//!
//! These are plain serializable state holders persisted in the visitor's
//! session (keys [`CART_STORAGE_KEY`] and [`USER_STORAGE_KEY`]) - the
//! server-side port of the original browser localStorage stores. Mutations
//! are synchronous; the last write to the session wins, and nothing here is
//! coordinated with order placement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use urban_echo_core::{ProductId, VariantId};

/// Session key for the cart state.
pub const CART_STORAGE_KEY: &str = "urban-echo-cart";

/// Session key for wishlist/user preference state.
pub const USER_STORAGE_KEY: &str = "urban-echo-user";

/// Maximum number of distinct lines in a cart.
pub const MAX_CART_ITEMS: usize = 50;

/// Maximum quantity of a single line.
pub const MAX_QUANTITY_PER_ITEM: u32 = 10;

/// Errors from cart mutations. A rejected mutation leaves state unchanged.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The cart already holds the maximum number of distinct lines.
    #[error("cart is full (max {max} items)")]
    CartFull { max: usize },

    /// The requested quantity exceeds the per-item limit.
    #[error("quantity limit exceeded (max {max} per item)")]
    QuantityLimit { max: u32 },

    /// No line matches the given product/variant.
    #[error("item not in cart")]
    ItemNotFound,
}

/// One cart line: a product (optionally a specific variant) and a quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub variant_id: Option<VariantId>,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// The cart: an ordered list of lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    pub lines: Vec<CartLine>,
}

impl CartState {
    /// Add a line to the cart.
    ///
    /// Lines merge by product+variant: adding an existing item increments its
    /// quantity instead of creating a duplicate. Adds that would exceed
    /// [`MAX_QUANTITY_PER_ITEM`] or [`MAX_CART_ITEMS`] are rejected and the
    /// cart is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityLimit`] or [`CartError::CartFull`].
    pub fn add_item(&mut self, line: CartLine) -> Result<(), CartError> {
        if line.quantity == 0 || line.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CartError::QuantityLimit {
                max: MAX_QUANTITY_PER_ITEM,
            });
        }

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id && l.variant_id == line.variant_id)
        {
            let merged = existing.quantity.saturating_add(line.quantity);
            if merged > MAX_QUANTITY_PER_ITEM {
                return Err(CartError::QuantityLimit {
                    max: MAX_QUANTITY_PER_ITEM,
                });
            }
            existing.quantity = merged;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CartError::CartFull {
                max: MAX_CART_ITEMS,
            });
        }

        self.lines.push(line);
        Ok(())
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity below 1 removes the line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line matches, or
    /// [`CartError::QuantityLimit`] if the quantity exceeds the per-item cap.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        variant_id: Option<VariantId>,
        quantity: i64,
    ) -> Result<(), CartError> {
        if quantity < 1 {
            if self.remove_item(product_id, variant_id) {
                return Ok(());
            }
            return Err(CartError::ItemNotFound);
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CartError::QuantityLimit {
                max: MAX_QUANTITY_PER_ITEM,
            });
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id && l.variant_id == variant_id)
            .ok_or(CartError::ItemNotFound)?;

        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line. Returns `true` if a line was removed.
    pub fn remove_item(&mut self, product_id: ProductId, variant_id: Option<VariantId>) -> bool {
        let before = self.lines.len();
        self.lines
            .retain(|l| !(l.product_id == product_id && l.variant_id == variant_id));
        self.lines.len() != before
    }

    /// Remove all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `quantity x unit_price` over all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| Decimal::from(l.quantity) * l.unit_price)
            .sum()
    }

    /// Total item count across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// A saved wishlist entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub added_at: DateTime<Utc>,
}

/// Session-persisted wishlist for guests.
///
/// Signed-in users get the database-backed wishlist instead
/// (`UserRepository::wishlist_*`); this container covers everyone else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistState {
    pub items: Vec<WishlistItem>,
}

impl WishlistState {
    /// Add a product. Idempotent: re-adding keeps the original timestamp.
    pub fn add(&mut self, product_id: ProductId) {
        if !self.contains(product_id) {
            self.items.push(WishlistItem {
                product_id,
                added_at: Utc::now(),
            });
        }
    }

    /// Remove a product. Returns `true` if an entry was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Whether a product is saved.
    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tee(quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new(1),
            variant_id: Some(VariantId::new(10)),
            name: "Classic Tee".to_string(),
            unit_price: Decimal::new(1999, 2),
            quantity,
        }
    }

    #[test]
    fn test_add_same_product_merges_instead_of_duplicating() {
        let mut cart = CartState::default();
        cart.add_item(tee(1)).unwrap();
        cart.add_item(tee(1)).unwrap();

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_add_beyond_quantity_limit_rejected_unchanged() {
        let mut cart = CartState::default();
        cart.add_item(tee(MAX_QUANTITY_PER_ITEM)).unwrap();

        let err = cart.add_item(tee(1)).unwrap_err();
        assert_eq!(
            err,
            CartError::QuantityLimit {
                max: MAX_QUANTITY_PER_ITEM
            }
        );
        // Quantity remains unchanged after the rejected add
        assert_eq!(cart.lines[0].quantity, MAX_QUANTITY_PER_ITEM);
    }

    #[test]
    fn test_add_distinct_variants_are_separate_lines() {
        let mut cart = CartState::default();
        cart.add_item(tee(1)).unwrap();

        let mut other = tee(1);
        other.variant_id = Some(VariantId::new(11));
        cart.add_item(other).unwrap();

        assert_eq!(cart.lines.len(), 2);
    }

    #[test]
    fn test_cart_full() {
        let mut cart = CartState::default();
        for i in 0..MAX_CART_ITEMS {
            let mut line = tee(1);
            line.product_id = ProductId::new(i32::try_from(i).unwrap());
            cart.add_item(line).unwrap();
        }

        let mut one_more = tee(1);
        one_more.product_id = ProductId::new(9999);
        assert_eq!(
            cart.add_item(one_more).unwrap_err(),
            CartError::CartFull {
                max: MAX_CART_ITEMS
            }
        );
        assert_eq!(cart.lines.len(), MAX_CART_ITEMS);
    }

    #[test]
    fn test_update_quantity_below_one_removes_line() {
        let mut cart = CartState::default();
        cart.add_item(tee(2)).unwrap();

        cart.update_quantity(ProductId::new(1), Some(VariantId::new(10)), 0)
            .unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_missing_item() {
        let mut cart = CartState::default();
        assert_eq!(
            cart.update_quantity(ProductId::new(1), None, 3).unwrap_err(),
            CartError::ItemNotFound
        );
    }

    #[test]
    fn test_subtotal_and_total_quantity() {
        let mut cart = CartState::default();
        cart.add_item(tee(3)).unwrap();

        let mut jacket = tee(1);
        jacket.product_id = ProductId::new(2);
        jacket.unit_price = Decimal::new(8999, 2);
        cart.add_item(jacket).unwrap();

        // 3 x 19.99 + 1 x 89.99 = 149.96
        assert_eq!(cart.subtotal(), Decimal::new(14996, 2));
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_clear() {
        let mut cart = CartState::default();
        cart.add_item(tee(1)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_wishlist_add_is_idempotent() {
        let mut wishlist = WishlistState::default();
        wishlist.add(ProductId::new(1));
        let first_added_at = wishlist.items[0].added_at;

        wishlist.add(ProductId::new(1));
        assert_eq!(wishlist.items.len(), 1);
        assert_eq!(wishlist.items[0].added_at, first_added_at);
    }

    #[test]
    fn test_wishlist_remove() {
        let mut wishlist = WishlistState::default();
        wishlist.add(ProductId::new(1));
        assert!(wishlist.remove(ProductId::new(1)));
        assert!(!wishlist.remove(ProductId::new(1)));
        assert!(!wishlist.contains(ProductId::new(1)));
    }

    #[test]
    fn test_cart_serde_roundtrip() {
        let mut cart = CartState::default();
        cart.add_item(tee(2)).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let back: CartState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.lines, cart.lines);
    }
}
