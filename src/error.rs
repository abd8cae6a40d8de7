//! Validation error type shared by the line item model and the submission
//! reconciler.
//!
//! Validation is always collected in batch: every violated field is recorded
//! before the error is returned, so a form can annotate all of its inputs
//! from a single rejection instead of surfacing one problem at a time.

use std::collections::BTreeMap;

use thiserror::Error;

/// A rejected-input error carrying one message per violated field.
///
/// Field keys mirror the names the submission payload uses (`client_id`,
/// `due_date`, ...) so callers can map them straight onto form inputs. The
/// map is ordered, which keeps error rendering deterministic.
///
/// # Example
/// ```rust
/// use invoice_core::ValidationError;
///
/// let mut err = ValidationError::new();
/// err.push("client_id", "a client is required");
/// err.push("due_date", "a due date is required");
/// assert_eq!(err.len(), 2);
/// assert!(err.contains("client_id"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    errors: BTreeMap<String, String>,
}

fn summarize(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Create an empty error to accumulate field violations into.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an error for a single field.
    pub fn single(field: &str, message: &str) -> Self {
        let mut err = Self::new();
        err.push(field, message);
        err
    }

    /// Record a violation for `field`. A later message for the same field
    /// replaces the earlier one.
    pub fn push(&mut self, field: &str, message: &str) {
        self.errors.insert(field.to_string(), message.to_string());
    }

    /// True when no field has been recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of violated fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when `field` was recorded.
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// The message recorded for `field`, if any.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterate over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .map(|(field, message)| (field.as_str(), message.as_str()))
    }

    /// `Ok(())` when empty, `Err(self)` otherwise. Lets validation code
    /// accumulate freely and decide at the end.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}
