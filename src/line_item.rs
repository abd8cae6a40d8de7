//! The line item model: one billable row of an invoice.
//!
//! A line item is either catalog-backed (`product_ref` set, built from a
//! [`Product`] snapshot) or custom (free-form description/price/tax). All
//! mutation goes through the owned setters below, which keep the derived
//! `amount` equal to `quantity * unit_price` at every step. `amount` is never
//! independently settable.

use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use crate::catalog::Product;
use crate::error::ValidationError;

/// One invoice row. Construct with [`LineItem::from_product`] or
/// [`LineItem::custom`]; mutate through the owned setters.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    id: String,
    product_ref: Option<String>,
    description: String,
    quantity: BigDecimal,
    unit_price: BigDecimal,
    tax_rate: BigDecimal,
    amount: BigDecimal,
}

impl LineItem {
    /// Build a catalog-backed item from a product, snapshotting its name,
    /// unit price, and tax rate at selection time. Later catalog edits do
    /// not flow back into the item.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] on `unit_price` when the product price
    /// is negative, or on `quantity` when the quantity is not positive.
    ///
    /// # Example
    /// ```rust
    /// use bigdecimal::BigDecimal;
    /// use invoice_core::{LineItem, ProductBuilder};
    ///
    /// let product = ProductBuilder::default()
    ///     .id("p-1")
    ///     .name("Widget")
    ///     .unit_price(BigDecimal::from(10))
    ///     .currency("USD")
    ///     .build()
    ///     .unwrap();
    /// let item = LineItem::from_product(&product, BigDecimal::from(3)).unwrap();
    /// assert_eq!(item.amount(), &BigDecimal::from(30));
    /// assert_eq!(item.product_ref(), Some("p-1"));
    /// ```
    pub fn from_product(
        product: &Product,
        quantity: BigDecimal,
    ) -> Result<LineItem, ValidationError> {
        let mut errors = ValidationError::new();
        if product.unit_price() < &BigDecimal::zero() {
            errors.push("unit_price", "product price must not be negative");
        }
        if quantity <= BigDecimal::zero() {
            errors.push("quantity", "quantity must be positive");
        }
        errors.into_result()?;

        let amount = &quantity * product.unit_price();
        Ok(LineItem {
            id: Uuid::new_v4().to_string(),
            product_ref: Some(product.id().to_string()),
            description: product.name().to_string(),
            quantity,
            unit_price: product.unit_price().clone(),
            tax_rate: product.tax_rate().clone(),
            amount,
        })
    }

    /// Build a free-form custom item. The description may be transiently
    /// empty while the user is typing; emptiness is only rejected at
    /// submission time by the reconciler.
    ///
    /// Out-of-range numeric input falls back silently, matching form
    /// behavior: a non-positive quantity becomes 1, a negative unit price
    /// becomes 0, and the tax rate is clamped to `[0, 100]`.
    pub fn custom(
        description: impl Into<String>,
        quantity: BigDecimal,
        unit_price: BigDecimal,
        tax_rate: BigDecimal,
    ) -> LineItem {
        let quantity = if quantity > BigDecimal::zero() {
            quantity
        } else {
            BigDecimal::from(1)
        };
        let unit_price = if unit_price >= BigDecimal::zero() {
            unit_price
        } else {
            BigDecimal::zero()
        };
        let amount = &quantity * &unit_price;
        LineItem {
            id: Uuid::new_v4().to_string(),
            product_ref: None,
            description: description.into(),
            quantity,
            unit_price,
            tax_rate: clamp_percent(tax_rate),
            amount,
        }
    }

    /// Rebuild an item from its persisted form. Catalog-backed rows keep the
    /// stored description/price snapshot; `amount` is recomputed so the
    /// invariant holds regardless of what was stored.
    pub fn hydrated(
        product_ref: Option<String>,
        description: impl Into<String>,
        quantity: BigDecimal,
        unit_price: BigDecimal,
        tax_rate: BigDecimal,
    ) -> LineItem {
        let item = LineItem::custom(description, quantity, unit_price, tax_rate);
        LineItem {
            product_ref,
            ..item
        }
    }

    /// Replace the quantity and recompute `amount`. A non-positive quantity
    /// is ignored and the previous value kept.
    pub fn set_quantity(mut self, quantity: BigDecimal) -> LineItem {
        if quantity > BigDecimal::zero() {
            self.quantity = quantity;
            self.amount = &self.quantity * &self.unit_price;
        }
        self
    }

    /// Replace the unit price and recompute `amount`. A negative price is
    /// ignored and the previous value kept.
    pub fn set_unit_price(mut self, unit_price: BigDecimal) -> LineItem {
        if unit_price >= BigDecimal::zero() {
            self.unit_price = unit_price;
            self.amount = &self.quantity * &self.unit_price;
        }
        self
    }

    /// Replace the description.
    pub fn set_description(mut self, description: impl Into<String>) -> LineItem {
        self.description = description.into();
        self
    }

    /// Replace the item-level tax rate, clamped to `[0, 100]`.
    pub fn set_tax_rate(mut self, tax_rate: BigDecimal) -> LineItem {
        self.tax_rate = clamp_percent(tax_rate);
        self
    }

    /// Detach the item from the catalog so it can be edited freely. The
    /// current description, quantity, price, and tax rate are all preserved.
    pub fn clear_product_link(mut self) -> LineItem {
        self.product_ref = None;
        self
    }

    /// True when the item references a catalog product. Submitting such an
    /// item sends only its product id and quantity; price and tax are
    /// re-resolved server-side, and stock is decremented by the quantity.
    pub fn is_catalog_backed(&self) -> bool {
        self.product_ref.is_some()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn product_ref(&self) -> Option<&str> {
        self.product_ref.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> &BigDecimal {
        &self.quantity
    }

    pub fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }

    pub fn tax_rate(&self) -> &BigDecimal {
        &self.tax_rate
    }

    /// The derived line total, always `quantity * unit_price`.
    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }
}

fn clamp_percent(value: BigDecimal) -> BigDecimal {
    if value < BigDecimal::zero() {
        BigDecimal::zero()
    } else if value > BigDecimal::from(100) {
        BigDecimal::from(100)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductBuilder;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn widget(price: &str, tax: &str) -> Product {
        ProductBuilder::default()
            .id("p-1")
            .name("Widget")
            .unit_price(dec(price))
            .tax_rate(dec(tax))
            .currency("USD")
            .build()
            .unwrap()
    }

    #[test]
    fn from_product_snapshots_name_price_and_tax() {
        let item = LineItem::from_product(&widget("10.00", "7.5"), dec("3")).unwrap();

        assert_eq!(item.product_ref(), Some("p-1"));
        assert_eq!(item.description(), "Widget");
        assert_eq!(item.unit_price(), &dec("10.00"));
        assert_eq!(item.tax_rate(), &dec("7.5"));
        assert_eq!(item.amount(), &dec("30.00"));
    }

    #[test]
    fn from_product_rejects_negative_price_and_zero_quantity() {
        let err = LineItem::from_product(&widget("-1", "0"), dec("0")).unwrap_err();
        assert!(err.contains("unit_price"));
        assert!(err.contains("quantity"));
    }

    #[test]
    fn amount_tracks_quantity_and_price_changes() {
        let item = LineItem::custom("Hours", dec("2"), dec("50"), dec("0"));
        assert_eq!(item.amount(), &dec("100"));

        let item = item.set_quantity(dec("3.5"));
        assert_eq!(item.amount(), &dec("175.0"));

        let item = item.set_unit_price(dec("40"));
        assert_eq!(item.amount(), &dec("140.0"));
        assert_eq!(item.amount(), &(item.quantity() * item.unit_price()));
    }

    #[test]
    fn invalid_setter_input_keeps_last_valid_value() {
        let item = LineItem::custom("Hours", dec("2"), dec("50"), dec("0"));

        let item = item.set_quantity(dec("-4"));
        assert_eq!(item.quantity(), &dec("2"));
        assert_eq!(item.amount(), &dec("100"));

        let item = item.set_unit_price(dec("-0.01"));
        assert_eq!(item.unit_price(), &dec("50"));
        assert_eq!(item.amount(), &dec("100"));
    }

    #[test]
    fn custom_clamps_out_of_range_construction_input() {
        let item = LineItem::custom("x", dec("0"), dec("-5"), dec("120"));
        assert_eq!(item.quantity(), &dec("1"));
        assert_eq!(item.unit_price(), &dec("0"));
        assert_eq!(item.tax_rate(), &dec("100"));
    }

    #[test]
    fn clear_product_link_preserves_fields() {
        let item = LineItem::from_product(&widget("10.00", "7.5"), dec("2")).unwrap();
        let detached = item.clone().clear_product_link();

        assert!(detached.product_ref().is_none());
        assert!(!detached.is_catalog_backed());
        assert_eq!(detached.description(), item.description());
        assert_eq!(detached.quantity(), item.quantity());
        assert_eq!(detached.unit_price(), item.unit_price());
        assert_eq!(detached.tax_rate(), item.tax_rate());
        assert_eq!(detached.amount(), item.amount());
    }

    #[test]
    fn hydrated_recomputes_amount_from_stored_fields() {
        let item = LineItem::hydrated(
            Some("p-1".to_string()),
            "Widget",
            dec("3"),
            dec("10.00"),
            dec("0"),
        );
        assert!(item.is_catalog_backed());
        assert_eq!(item.amount(), &dec("30.00"));
    }

    #[test]
    fn items_get_distinct_local_ids() {
        let a = LineItem::custom("a", dec("1"), dec("1"), dec("0"));
        let b = LineItem::custom("b", dec("1"), dec("1"), dec("0"));
        assert_ne!(a.id(), b.id());
    }
}
