//! Shared invoice computation and reconciliation core.
//!
//! Every client surface of the invoicing product builds invoices the same
//! way: line items drawn from a product catalog or entered free-form, an
//! invoice-level discount and tax percent, and a create/update request sent
//! to the backend API. This crate is the single implementation of that
//! arithmetic and of the payload assembly, so the surfaces cannot drift on
//! rounding or on the discount/tax order of operations.
//!
//! The crate is pure: no I/O, no lookups, no network. Catalog products and
//! clients arrive already resolved; the output is an [`InvoiceSubmission`]
//! value the caller serializes and ships. Collaborator failures (catalog
//! unavailable, request failed) are the caller's problem by design.
//!
//! # Example
//!
//! ```rust
//! use bigdecimal::BigDecimal;
//! use chrono::NaiveDate;
//! use invoice_core::{
//!     DueDatePolicy, Invoice, LineItem, ProductBuilder, TaxMode, build_submission,
//! };
//!
//! // Resolved by the caller's catalog lookup.
//! let product = ProductBuilder::default()
//!     .id("p-1")
//!     .name("Widget")
//!     .unit_price(BigDecimal::from(10))
//!     .currency("USD")
//!     .build()
//!     .unwrap();
//!
//! let mut invoice = Invoice::new("USD");
//! invoice.set_client("c-1");
//! invoice.issue_on(
//!     NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
//!     DueDatePolicy::PlusDays(30),
//! );
//! invoice.push_item(LineItem::from_product(&product, BigDecimal::from(2)).unwrap());
//! invoice.push_item(LineItem::custom(
//!     "Installation",
//!     BigDecimal::from(1),
//!     BigDecimal::from(50),
//!     BigDecimal::from(0),
//! ));
//!
//! let submission = build_submission(&invoice, TaxMode::Explicit).unwrap();
//! let json = serde_json::to_value(&submission).unwrap();
//! assert_eq!(json["subtotal"], "70.00");
//! assert_eq!(json["product_items"][0]["product_id"], "p-1");
//! assert_eq!(json["items"][0]["description"], "Installation");
//! ```

pub mod catalog;
pub mod error;
pub mod extraction;
pub mod invoice;
pub mod line_item;
pub mod money;
pub mod submission;
pub mod totals;

pub use catalog::{
    Client, ClientBuilder, ClientBuilderError, Product, ProductBuilder, ProductBuilderError,
};
pub use error::ValidationError;
pub use extraction::{
    ExtractedClient, ExtractedDates, ExtractedFinancial, ExtractedLineItem, ExtractionDraft,
};
pub use invoice::{DueDatePolicy, Invoice, InvoiceStatus, PersistedInvoice, PersistedItem};
pub use line_item::LineItem;
pub use money::{round2, to_money_string};
pub use submission::{CustomItemPayload, InvoiceSubmission, ProductItemPayload, build_submission};
pub use totals::{InvoiceTotals, TaxMode, compute_totals, per_item_tax_total};
