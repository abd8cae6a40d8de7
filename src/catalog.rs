//! Read-only collaborator types: the product catalog and the client book.
//!
//! The core never mutates a [`Product`] or a [`Client`]; both arrive already
//! resolved from whatever lookup the caller performed. A line item built from
//! a product snapshots its name, price, and tax rate at selection time, so a
//! later catalog edit never retroactively changes an invoice draft.

use bigdecimal::BigDecimal;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::money::{deserialize_decimal, serialize_decimal};

/// One product catalog entry, as returned by the catalog lookup.
///
/// `unit_price` and `tax_rate` travel as decimal strings on the wire.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(strip_option, into), pattern = "owned")]
pub struct Product {
    id: String,
    name: String,
    #[serde(
        serialize_with = "serialize_decimal",
        deserialize_with = "deserialize_decimal"
    )]
    unit_price: BigDecimal,
    #[serde(
        default,
        serialize_with = "serialize_decimal",
        deserialize_with = "deserialize_decimal"
    )]
    #[builder(default = BigDecimal::from(0))]
    tax_rate: BigDecimal,
    currency: String,
    #[builder(default = true)]
    #[serde(default = "default_true")]
    is_active: bool,
    #[builder(default)]
    #[serde(default)]
    category: Option<String>,
    #[builder(default)]
    #[serde(default)]
    sku: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> &BigDecimal {
        &self.unit_price
    }

    pub fn tax_rate(&self) -> &BigDecimal {
        &self.tax_rate
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref()
    }
}

/// A client referenced by an invoice. Referenced by id only; the core never
/// edits one.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(strip_option, into), pattern = "owned")]
pub struct Client {
    id: String,
    name: String,
    #[builder(default)]
    #[serde(default)]
    email: Option<String>,
    #[builder(default)]
    #[serde(default)]
    phone: Option<String>,
    #[builder(default)]
    #[serde(default)]
    address: Option<String>,
}

impl Client {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}
