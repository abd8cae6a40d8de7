//! The invoice totals calculator.
//!
//! This is the one piece of arithmetic every client surface must agree on,
//! so the order of operations is fixed: sum line amounts, apply the
//! invoice-level discount to the subtotal, resolve the tax percent, apply tax
//! to the discounted subtotal. Values stay at full decimal precision here;
//! rounding to 2 digits happens only for the derived tax percent (which the
//! backend stores rounded) and at the serialization boundary.
//!
//! A second, deliberately separate path exists for the per-item breakdown
//! some displays use: [`per_item_tax_total`] taxes each line individually and
//! ignores the invoice-level discount. The two paths disagree whenever a
//! discount is present; callers must name the one they mean instead of
//! mixing them.

use bigdecimal::{BigDecimal, Zero};

use crate::line_item::LineItem;
use crate::money::round2;

/// How the invoice's effective tax percent is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaxMode {
    /// Use the invoice-level tax percent exactly as set.
    #[default]
    Explicit,
    /// Derive the tax percent as the amount-weighted average of the line
    /// items' individual tax rates. Falls back to the explicit value when no
    /// item carries tax, so a previously entered percent is never silently
    /// zeroed.
    Derived,
}

/// The computed money fields of an invoice.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceTotals {
    pub subtotal: BigDecimal,
    pub discount_amount: BigDecimal,
    pub subtotal_after_discount: BigDecimal,
    /// The resolved tax percent (explicit, or weighted per [`TaxMode::Derived`]).
    pub tax_percent: BigDecimal,
    pub tax_amount: BigDecimal,
    pub total: BigDecimal,
}

impl InvoiceTotals {
    fn zero_with_tax_percent(tax_percent: BigDecimal) -> InvoiceTotals {
        InvoiceTotals {
            subtotal: BigDecimal::zero(),
            discount_amount: BigDecimal::zero(),
            subtotal_after_discount: BigDecimal::zero(),
            tax_percent,
            tax_amount: BigDecimal::zero(),
            total: BigDecimal::zero(),
        }
    }
}

/// Compute subtotal, discount, tax, and total for a set of line items.
///
/// The steps, in order:
/// 1. `subtotal = Σ item.amount`
/// 2. `discount_amount = subtotal * discount_percent / 100`
/// 3. `subtotal_after_discount = subtotal - discount_amount`
/// 4. resolve `tax_percent` per `mode` (derived weighting uses pre-discount
///    item amounts; the discount is applied once, at the invoice level)
/// 5. `tax_amount = subtotal_after_discount * tax_percent / 100`
/// 6. `total = subtotal_after_discount + tax_amount`
///
/// `discount_percent` and `tax_percent` are assumed already validated to
/// `[0, 100]`; range enforcement is the boundary's job, not this function's.
/// A zero subtotal short-circuits to all-zero output with no division.
///
/// # Example
/// ```rust
/// use bigdecimal::BigDecimal;
/// use invoice_core::{compute_totals, LineItem, TaxMode};
///
/// let items = vec![LineItem::custom(
///     "Design work",
///     BigDecimal::from(10),
///     BigDecimal::from(10),
///     BigDecimal::from(0),
/// )];
/// let totals = compute_totals(
///     &items,
///     &BigDecimal::from(10),
///     &BigDecimal::from(20),
///     TaxMode::Explicit,
/// );
/// assert_eq!(totals.discount_amount, BigDecimal::from(10));
/// assert_eq!(totals.tax_amount, BigDecimal::from(18));
/// assert_eq!(totals.total, BigDecimal::from(108));
/// ```
pub fn compute_totals(
    items: &[LineItem],
    discount_percent: &BigDecimal,
    tax_percent: &BigDecimal,
    mode: TaxMode,
) -> InvoiceTotals {
    let hundred = BigDecimal::from(100);

    let subtotal: BigDecimal = items.iter().map(|item| item.amount().clone()).sum();
    if subtotal.is_zero() {
        return InvoiceTotals::zero_with_tax_percent(tax_percent.clone());
    }

    let discount_amount = &subtotal * discount_percent / &hundred;
    let subtotal_after_discount = &subtotal - &discount_amount;

    let resolved_tax_percent = match mode {
        TaxMode::Explicit => tax_percent.clone(),
        TaxMode::Derived => {
            let any_taxed = items
                .iter()
                .any(|item| item.tax_rate() > &BigDecimal::zero());
            if any_taxed {
                let weighted: BigDecimal = items
                    .iter()
                    .map(|item| item.amount() * item.tax_rate())
                    .sum();
                round2(&(weighted / &subtotal))
            } else {
                // No item carries tax; leave the explicit percent untouched.
                tax_percent.clone()
            }
        }
    };

    let tax_amount = &subtotal_after_discount * &resolved_tax_percent / &hundred;
    let total = &subtotal_after_discount + &tax_amount;

    InvoiceTotals {
        subtotal,
        discount_amount,
        subtotal_after_discount,
        tax_percent: resolved_tax_percent,
        tax_amount,
        total,
    }
}

/// Sum of `quantity * unit_price * (1 + tax_rate / 100)` across items.
///
/// This is the per-item breakdown path used where tax is shown per line
/// rather than at invoice level. It bypasses the invoice-level discount
/// entirely and therefore diverges from [`compute_totals`] whenever a
/// discount is set.
pub fn per_item_tax_total(items: &[LineItem]) -> BigDecimal {
    let hundred = BigDecimal::from(100);
    items
        .iter()
        .map(|item| item.amount() * (BigDecimal::from(1) + item.tax_rate() / &hundred))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn custom(qty: &str, price: &str, tax: &str) -> LineItem {
        LineItem::custom("row", dec(qty), dec(price), dec(tax))
    }

    #[test]
    fn subtotal_is_additive_and_order_independent() {
        let a = custom("2", "10", "0");
        let b = custom("1", "7.25", "0");
        let c = custom("3", "0.50", "0");

        let forward = compute_totals(
            &[a.clone(), b.clone(), c.clone()],
            &dec("0"),
            &dec("0"),
            TaxMode::Explicit,
        );
        let backward = compute_totals(&[c, b, a], &dec("0"), &dec("0"), TaxMode::Explicit);

        assert_eq!(forward.subtotal, dec("28.75"));
        assert_eq!(forward.subtotal, backward.subtotal);
        assert_eq!(forward.total, backward.total);
    }

    #[test]
    fn discount_applies_before_tax() {
        // subtotal 100, discount 10%, tax 20% => 100 -> 90 -> 108
        let items = vec![custom("10", "10", "0")];
        let totals = compute_totals(&items, &dec("10"), &dec("20"), TaxMode::Explicit);

        assert_eq!(totals.subtotal, dec("100"));
        assert_eq!(totals.discount_amount, dec("10"));
        assert_eq!(totals.subtotal_after_discount, dec("90"));
        assert_eq!(totals.tax_amount, dec("18"));
        assert_eq!(totals.total, dec("108"));
    }

    #[test]
    fn derived_tax_is_weighted_by_pre_discount_amount() {
        // amounts 100 @ 10% and 300 @ 0% => (100*10 + 300*0) / 400 = 2.5
        let items = vec![custom("1", "100", "10"), custom("1", "300", "0")];
        let totals = compute_totals(&items, &dec("0"), &dec("0"), TaxMode::Derived);

        assert_eq!(totals.tax_percent, dec("2.50"));
        assert_eq!(totals.tax_amount, dec("10.0000"));
        assert_eq!(totals.total, dec("410"));
    }

    #[test]
    fn derived_tax_ignores_invoice_discount_in_weighting() {
        let items = vec![custom("1", "100", "10"), custom("1", "300", "0")];
        let with_discount = compute_totals(&items, &dec("50"), &dec("0"), TaxMode::Derived);
        let without_discount = compute_totals(&items, &dec("0"), &dec("0"), TaxMode::Derived);

        // The weighting is identical; only the taxed base shrinks.
        assert_eq!(with_discount.tax_percent, without_discount.tax_percent);
        assert_eq!(with_discount.tax_amount, dec("5.0000"));
    }

    #[test]
    fn derived_mode_keeps_explicit_percent_when_no_item_is_taxed() {
        let items = vec![custom("1", "100", "0")];
        let totals = compute_totals(&items, &dec("0"), &dec("7.5"), TaxMode::Derived);

        assert_eq!(totals.tax_percent, dec("7.5"));
        assert_eq!(totals.total, dec("107.500"));
    }

    #[test]
    fn derived_mode_with_taxed_zero_amount_line_derives_zero() {
        // A taxed line whose amount is zero still counts as "carries tax":
        // the weighting runs and yields 0, it does not revert to the
        // explicit percent.
        let items = vec![custom("1", "0", "10"), custom("1", "100", "0")];
        let totals = compute_totals(&items, &dec("0"), &dec("7.5"), TaxMode::Derived);

        assert_eq!(totals.tax_percent, dec("0.00"));
        assert_eq!(totals.tax_amount, dec("0.00"));
        assert_eq!(totals.total, dec("100.00"));
    }

    #[test]
    fn empty_items_yield_all_zeros_without_division() {
        let totals = compute_totals(&[], &dec("10"), &dec("20"), TaxMode::Derived);

        assert_eq!(totals.subtotal, dec("0"));
        assert_eq!(totals.discount_amount, dec("0"));
        assert_eq!(totals.tax_amount, dec("0"));
        assert_eq!(totals.total, dec("0"));
    }

    #[test]
    fn fractional_quantities_keep_full_precision() {
        // 2.5 hours at 19.99 = 49.975; nothing rounds until presentation.
        let items = vec![custom("2.5", "19.99", "0")];
        let totals = compute_totals(&items, &dec("0"), &dec("0"), TaxMode::Explicit);
        assert_eq!(totals.subtotal, dec("49.975"));
    }

    #[test]
    fn per_item_path_diverges_from_invoice_level_under_discount() {
        let items = vec![custom("1", "100", "10")];

        let per_item = per_item_tax_total(&items);
        assert_eq!(per_item, dec("110.00"));

        let invoice_level = compute_totals(&items, &dec("10"), &dec("0"), TaxMode::Derived);
        // 100 -> 90 after discount, then 10% tax => 99, not 110.
        assert_eq!(invoice_level.total, dec("99.0000"));
        assert_ne!(per_item, invoice_level.total);
    }

    #[test]
    fn worked_scenario_explicit_tax() {
        // Widget: qty 3 @ 10.00, no discount, explicit 7.5% => 30.00 / 32.25
        let items = vec![LineItem::custom("Widget", dec("3"), dec("10.00"), dec("0"))];
        let totals = compute_totals(&items, &dec("0"), &dec("7.5"), TaxMode::Explicit);

        assert_eq!(totals.subtotal, dec("30.00"));
        assert_eq!(totals.total, dec("32.25"));
    }
}
