//! The invoice aggregate being built or edited.
//!
//! An aggregate is constructed fresh for create flows (optionally pre-seeded
//! from an extraction draft, see [`crate::extraction`]) or hydrated from a
//! persisted invoice for edit flows, and discarded after submission. Status
//! is purely descriptive here; transition side effects such as marking an
//! invoice overdue live server-side.

use bigdecimal::{BigDecimal, Zero};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::line_item::LineItem;
use crate::money::deserialize_decimal;
use crate::totals::{InvoiceTotals, TaxMode, compute_totals};

/// Invoice lifecycle status, stored and transmitted in snake_case string
/// form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
            InvoiceStatus::Cancelled => "cancelled",
        }
    }

    /// Parse the stored string form; anything unrecognized is treated as a
    /// draft, matching how the backend defaults the field.
    pub fn from_string(s: &str) -> Self {
        match s {
            "sent" => InvoiceStatus::Sent,
            "paid" => InvoiceStatus::Paid,
            "overdue" => InvoiceStatus::Overdue,
            "cancelled" => InvoiceStatus::Cancelled,
            _ => InvoiceStatus::Draft,
        }
    }
}

/// Default due-date offset relative to the issue date. The two client
/// surfaces historically disagreed on this, so the calling surface chooses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDatePolicy {
    /// Due on the issue date.
    Zero,
    /// Due a fixed number of days after the issue date.
    PlusDays(u32),
}

impl DueDatePolicy {
    /// Resolve the default due date for an invoice issued on `issued`.
    pub fn due_date_from(&self, issued: NaiveDate) -> NaiveDate {
        match self {
            DueDatePolicy::Zero => issued,
            DueDatePolicy::PlusDays(days) => issued
                .checked_add_days(Days::new(u64::from(*days)))
                .unwrap_or(issued),
        }
    }
}

/// A working invoice: client reference, dates, invoice-level modifiers, and
/// an ordered list of line items. Currency is a label only; no conversion is
/// ever performed.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    client_ref: Option<String>,
    number: Option<String>,
    issued_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    currency: String,
    discount_percent: BigDecimal,
    tax_percent: BigDecimal,
    status: InvoiceStatus,
    notes: Option<String>,
    line_items: Vec<LineItem>,
}

impl Invoice {
    /// Fresh draft with no client, no dates, and zero modifiers.
    pub fn new(currency: impl Into<String>) -> Invoice {
        Invoice {
            client_ref: None,
            number: None,
            issued_date: None,
            due_date: None,
            currency: currency.into(),
            discount_percent: BigDecimal::zero(),
            tax_percent: BigDecimal::zero(),
            status: InvoiceStatus::Draft,
            notes: None,
            line_items: Vec::new(),
        }
    }

    /// Rebuild a working aggregate from a persisted invoice so it can be
    /// edited and resubmitted.
    ///
    /// The stored `discount` and `tax` fields are monetary amounts, exactly
    /// as submitted; the working aggregate carries percents, so both are
    /// re-derived here against the item subtotal (discount against the full
    /// subtotal, tax against the discounted one). Line item amounts are
    /// recomputed from the stored quantity and unit price. Together that
    /// makes hydrate-then-submit with no edits reproduce the stored
    /// `subtotal`/`discount`/`tax`/`total` values.
    pub fn hydrate(persisted: &PersistedInvoice) -> Invoice {
        let line_items: Vec<LineItem> = persisted
            .items
            .iter()
            .map(|item| {
                LineItem::hydrated(
                    item.product_id.clone(),
                    item.description.clone(),
                    item.quantity.clone(),
                    item.unit_price.clone(),
                    item.tax_rate(),
                )
            })
            .collect();

        let subtotal: BigDecimal = line_items.iter().map(|item| item.amount().clone()).sum();
        let discount_amount = persisted.discount.clone().unwrap_or_else(BigDecimal::zero);
        let discount_percent = percent_of(&discount_amount, &subtotal);
        let taxed_base = &subtotal - &discount_amount;
        let tax_amount = persisted.tax.clone().unwrap_or_else(BigDecimal::zero);
        let tax_percent = percent_of(&tax_amount, &taxed_base);

        Invoice {
            client_ref: Some(persisted.client_id.clone()),
            number: persisted.number.clone(),
            issued_date: persisted.issued_date,
            due_date: persisted.due_date,
            currency: persisted.currency.clone(),
            discount_percent,
            tax_percent,
            status: InvoiceStatus::from_string(&persisted.status),
            notes: persisted.notes.clone(),
            line_items,
        }
    }

    pub fn set_client(&mut self, client_id: impl Into<String>) {
        self.client_ref = Some(client_id.into());
    }

    pub fn set_number(&mut self, number: impl Into<String>) {
        self.number = Some(number.into());
    }

    /// Set the issue date and default the due date per `policy` unless a due
    /// date was already chosen.
    pub fn issue_on(&mut self, issued: NaiveDate, policy: DueDatePolicy) {
        self.issued_date = Some(issued);
        if self.due_date.is_none() {
            self.due_date = Some(policy.due_date_from(issued));
        }
    }

    pub fn set_issued_date(&mut self, issued: NaiveDate) {
        self.issued_date = Some(issued);
    }

    pub fn set_due_date(&mut self, due: NaiveDate) {
        self.due_date = Some(due);
    }

    pub fn set_status(&mut self, status: InvoiceStatus) {
        self.status = status;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = Some(notes.into());
    }

    /// Set the invoice-level discount percent.
    ///
    /// # Errors
    /// Rejects values outside `[0, 100]` with a `discount` field error; the
    /// previous value is kept.
    pub fn set_discount_percent(&mut self, percent: BigDecimal) -> Result<(), ValidationError> {
        validate_percent(&percent, "discount")?;
        self.discount_percent = percent;
        Ok(())
    }

    /// Set the explicit invoice-level tax percent.
    ///
    /// # Errors
    /// Rejects values outside `[0, 100]` with a `tax` field error; the
    /// previous value is kept.
    pub fn set_tax_percent(&mut self, percent: BigDecimal) -> Result<(), ValidationError> {
        validate_percent(&percent, "tax")?;
        self.tax_percent = percent;
        Ok(())
    }

    /// Append a line item. Insertion order is display order only.
    pub fn push_item(&mut self, item: LineItem) {
        self.line_items.push(item);
    }

    /// Remove the item at `index`, if any.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index < self.line_items.len() {
            Some(self.line_items.remove(index))
        } else {
            None
        }
    }

    /// Replace the item at `index` with the result of `edit`. Used by forms
    /// that edit a row through the owned [`LineItem`] setters.
    pub fn edit_item(&mut self, index: usize, edit: impl FnOnce(LineItem) -> LineItem) {
        if index < self.line_items.len() {
            let item = self.line_items.remove(index);
            self.line_items.insert(index, edit(item));
        }
    }

    /// Compute the current money fields per the shared calculator.
    pub fn totals(&self, mode: TaxMode) -> InvoiceTotals {
        compute_totals(
            &self.line_items,
            &self.discount_percent,
            &self.tax_percent,
            mode,
        )
    }

    pub fn client_ref(&self) -> Option<&str> {
        self.client_ref.as_deref()
    }

    pub fn number(&self) -> Option<&str> {
        self.number.as_deref()
    }

    pub fn issued_date(&self) -> Option<NaiveDate> {
        self.issued_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn discount_percent(&self) -> &BigDecimal {
        &self.discount_percent
    }

    pub fn tax_percent(&self) -> &BigDecimal {
        &self.tax_percent
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }
}

pub(crate) fn validate_percent(value: &BigDecimal, field: &str) -> Result<(), ValidationError> {
    if *value < BigDecimal::zero() || *value > BigDecimal::from(100) {
        return Err(ValidationError::single(field, "must be between 0 and 100"));
    }
    Ok(())
}

/// What percent of `base` is `amount`. Zero when either side is zero, so a
/// stored invoice with no items or no modifier never divides.
fn percent_of(amount: &BigDecimal, base: &BigDecimal) -> BigDecimal {
    if base.is_zero() || amount.is_zero() {
        BigDecimal::zero()
    } else {
        amount * BigDecimal::from(100) / base
    }
}

/// A stored invoice as the backend returns it, used to hydrate an edit flow.
/// The shape is the submission shape: `discount` and `tax` are monetary
/// amounts, and items carry the full tuple even when product-backed;
/// `product_id` marks which ones re-resolve server-side on the next
/// submission.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistedInvoice {
    pub client_id: String,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub issued_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub currency: String,
    #[serde(
        default,
        deserialize_with = "crate::money::deserialize_lenient_decimal"
    )]
    pub discount: Option<BigDecimal>,
    #[serde(
        default,
        deserialize_with = "crate::money::deserialize_lenient_decimal"
    )]
    pub tax: Option<BigDecimal>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub items: Vec<PersistedItem>,
}

fn default_status() -> String {
    "draft".to_string()
}

/// One stored line item.
#[derive(Debug, Clone, Deserialize)]
pub struct PersistedItem {
    #[serde(default)]
    pub product_id: Option<String>,
    pub description: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub quantity: BigDecimal,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub unit_price: BigDecimal,
    #[serde(
        default,
        deserialize_with = "crate::money::deserialize_lenient_decimal"
    )]
    pub tax_rate: Option<BigDecimal>,
}

impl PersistedItem {
    fn tax_rate(&self) -> BigDecimal {
        self.tax_rate.clone().unwrap_or_else(BigDecimal::zero)
    }
}
