//! Pre-seeding a fresh invoice from an externally produced extraction draft.
//!
//! The extractor turns a screenshot or pasted text into a loose JSON draft.
//! The caller sources that draft from whatever transient channel it uses
//! (and is responsible for clearing it); this module only consumes it as an
//! explicit input. Extracted values are advisory: unparseable numbers and
//! dates become `None` rather than failing the whole seed.

use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::catalog::Client;
use crate::invoice::{DueDatePolicy, Invoice};
use crate::line_item::LineItem;
use crate::money::deserialize_lenient_decimal;

/// The draft payload an extraction run produces.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractionDraft {
    #[serde(default)]
    pub client: ExtractedClient,
    #[serde(default)]
    pub invoice_details: ExtractedDates,
    #[serde(default)]
    pub line_items: Vec<ExtractedLineItem>,
    #[serde(default)]
    pub financial: ExtractedFinancial,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedClient {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedDates {
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub issued_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedLineItem {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub quantity: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub unit_price: Option<BigDecimal>,
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub tax_rate: Option<BigDecimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractedFinancial {
    #[serde(default, deserialize_with = "deserialize_lenient_decimal")]
    pub tax: Option<BigDecimal>,
}

fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}

impl ExtractionDraft {
    /// Match the extracted client against known clients by exact
    /// case-insensitive name or email equality. Never fuzzy: a near-miss is
    /// a non-match and the user picks manually.
    pub fn match_client<'a>(&self, clients: &'a [Client]) -> Option<&'a Client> {
        let name = normalized(self.client.name.as_deref());
        let email = normalized(self.client.email.as_deref());
        if name.is_none() && email.is_none() {
            return None;
        }

        clients.iter().find(|client| {
            let name_matches = name
                .as_deref()
                .is_some_and(|n| client.name().to_lowercase() == n);
            let email_matches = email.as_deref().is_some_and(|e| {
                client
                    .email()
                    .is_some_and(|candidate| candidate.to_lowercase() == e)
            });
            name_matches || email_matches
        })
    }

    /// Pre-populate a fresh invoice aggregate from this draft.
    ///
    /// Extracted line items become custom items (quantity defaults to 1,
    /// price to 0, tax to 0 when missing). An extracted tax percent is
    /// applied only when it parses into `[0, 100]`. `client_id` is the
    /// result of [`ExtractionDraft::match_client`], passed in explicitly so
    /// the caller stays in control of the lookup.
    pub fn into_invoice(
        self,
        client_id: Option<&str>,
        currency: impl Into<String>,
        policy: DueDatePolicy,
    ) -> Invoice {
        let mut invoice = Invoice::new(currency);

        if let Some(client_id) = client_id {
            invoice.set_client(client_id);
        }
        if let Some(due) = self.invoice_details.due_date {
            invoice.set_due_date(due);
        }
        if let Some(issued) = self.invoice_details.issued_date {
            invoice.issue_on(issued, policy);
        }
        if let Some(tax) = self.financial.tax {
            // Out-of-range extractions are dropped, not clamped.
            let _ = invoice.set_tax_percent(tax);
        }
        if let Some(notes) = self.notes {
            invoice.set_notes(notes);
        }

        for extracted in self.line_items {
            invoice.push_item(LineItem::custom(
                extracted.description.unwrap_or_default(),
                extracted.quantity.unwrap_or_else(|| BigDecimal::from(1)),
                extracted.unit_price.unwrap_or_else(BigDecimal::zero),
                extracted.tax_rate.unwrap_or_else(BigDecimal::zero),
            ));
        }

        invoice
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}
