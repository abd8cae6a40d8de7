//! The submission reconciler: turning a working invoice into the wire
//! payload the backend expects.
//!
//! Line items are routed by their product link. Catalog-backed rows submit
//! only `{product_id, quantity}`; price, tax, and description are
//! authoritative on the server's product record and re-resolved there, and
//! sending the reference is what triggers the server-side stock decrement.
//! Custom rows submit the full tuple. An absent `items`/`product_items`
//! array is meaningful to the backend and is not the same as an empty one,
//! so empty partitions are omitted from the payload entirely.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::ValidationError;
use crate::invoice::{Invoice, validate_percent};
use crate::money::{serialize_decimal, serialize_money};
use crate::totals::TaxMode;

/// A catalog-backed row on the wire. Deliberately omits price, tax, and
/// description; the server re-resolves them from the product record.
#[derive(Debug, Clone, Serialize)]
pub struct ProductItemPayload {
    pub product_id: String,
    #[serde(serialize_with = "serialize_decimal")]
    pub quantity: BigDecimal,
}

/// A custom row on the wire, fully self-described.
#[derive(Debug, Clone, Serialize)]
pub struct CustomItemPayload {
    pub description: String,
    #[serde(serialize_with = "serialize_decimal")]
    pub quantity: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub unit_price: BigDecimal,
    #[serde(serialize_with = "serialize_decimal")]
    pub tax_rate: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub amount: BigDecimal,
}

/// The invoice create/update request body. Monetary fields are decimal
/// strings with 2 fraction digits; dates are `YYYY-MM-DD`.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceSubmission {
    pub client_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub issued_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<CustomItemPayload>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_items: Option<Vec<ProductItemPayload>>,
    #[serde(serialize_with = "serialize_money")]
    pub subtotal: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub discount: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub tax: BigDecimal,
    #[serde(serialize_with = "serialize_money")]
    pub total: BigDecimal,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Validate a working invoice and assemble its submission payload.
///
/// Validation is batch: every violated field is collected into a single
/// [`ValidationError`] so the form can annotate all inputs at once. Checked
/// fields: `client_id`, `issued_date`, `due_date`, `discount`, `tax`, at
/// least one line item with a non-empty description (`items`), and a
/// non-empty description on every custom row (`items[N].description`).
///
/// This is a single-shot pure transform; retries, in-flight dedup, and the
/// network call itself belong to the caller.
///
/// # Example
/// ```rust
/// use bigdecimal::BigDecimal;
/// use chrono::NaiveDate;
/// use invoice_core::{DueDatePolicy, Invoice, LineItem, TaxMode, build_submission};
///
/// let mut invoice = Invoice::new("USD");
/// invoice.set_client("c-1");
/// invoice.issue_on(
///     NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     DueDatePolicy::PlusDays(30),
/// );
/// invoice.set_tax_percent(BigDecimal::try_from(7.5).unwrap()).unwrap();
/// invoice.push_item(LineItem::custom(
///     "Widget",
///     BigDecimal::from(3),
///     BigDecimal::from(10),
///     BigDecimal::from(0),
/// ));
///
/// let submission = build_submission(&invoice, TaxMode::Explicit).unwrap();
/// let json = serde_json::to_value(&submission).unwrap();
/// assert_eq!(json["subtotal"], "30.00");
/// assert_eq!(json["total"], "32.25");
/// ```
pub fn build_submission(
    invoice: &Invoice,
    mode: TaxMode,
) -> Result<InvoiceSubmission, ValidationError> {
    let mut errors = ValidationError::new();

    if invoice.client_ref().is_none() {
        errors.push("client_id", "a client is required");
    }
    if invoice.issued_date().is_none() {
        errors.push("issued_date", "an issue date is required");
    }
    if invoice.due_date().is_none() {
        errors.push("due_date", "a due date is required");
    }
    if let Err(e) = validate_percent(invoice.discount_percent(), "discount") {
        errors.push("discount", e.message("discount").unwrap_or("invalid"));
    }
    if let Err(e) = validate_percent(invoice.tax_percent(), "tax") {
        errors.push("tax", e.message("tax").unwrap_or("invalid"));
    }

    let any_described = invoice
        .line_items()
        .iter()
        .any(|item| !item.description().trim().is_empty());
    if !any_described {
        errors.push("items", "at least one line item with a description is required");
    }
    for (index, item) in invoice.line_items().iter().enumerate() {
        if !item.is_catalog_backed() && item.description().trim().is_empty() {
            errors.push(
                &format!("items[{index}].description"),
                "a description is required",
            );
        }
    }

    if let Err(errors) = errors.into_result() {
        debug!(fields = errors.len(), "invoice submission rejected");
        return Err(errors);
    }

    let mut product_items = Vec::new();
    let mut custom_items = Vec::new();
    for item in invoice.line_items() {
        match item.product_ref() {
            Some(product_id) => product_items.push(ProductItemPayload {
                product_id: product_id.to_string(),
                quantity: item.quantity().clone(),
            }),
            None => custom_items.push(CustomItemPayload {
                description: item.description().to_string(),
                quantity: item.quantity().clone(),
                unit_price: item.unit_price().clone(),
                tax_rate: item.tax_rate().clone(),
                amount: item.amount().clone(),
            }),
        }
    }

    let totals = invoice.totals(mode);

    debug!(
        catalog_items = product_items.len(),
        custom_items = custom_items.len(),
        currency = invoice.currency(),
        "invoice submission payload built"
    );

    Ok(InvoiceSubmission {
        client_id: invoice
            .client_ref()
            .unwrap_or_default()
            .to_string(),
        number: invoice.number().map(str::to_string),
        issued_date: invoice.issued_date().unwrap_or_default(),
        due_date: invoice.due_date().unwrap_or_default(),
        currency: invoice.currency().to_string(),
        items: if custom_items.is_empty() {
            None
        } else {
            Some(custom_items)
        },
        product_items: if product_items.is_empty() {
            None
        } else {
            Some(product_items)
        },
        subtotal: totals.subtotal,
        discount: totals.discount_amount,
        tax: totals.tax_amount,
        total: totals.total,
        status: invoice.status().as_str().to_string(),
        notes: invoice.notes().map(str::to_string),
    })
}
