//! Transaction ledger types and input validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// A dated, categorized monetary entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub date: NaiveDate,
    /// Positive integer currency units.
    pub amount: i64,
    pub description: Option<String>,
    /// May be absent: uncategorized entries are allowed.
    pub category_id: Option<String>,
}

/// A validated transaction ready for insert or update; the store issues the id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: i64,
    pub description: Option<String>,
    pub category_id: Option<String>,
}

/// Form-level input for creating or editing a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionDraft {
    pub date: Option<NaiveDate>,
    pub amount: i64,
    pub description: Option<String>,
    pub category_id: Option<String>,
}

impl TransactionDraft {
    /// Per-field validation: every offending field is reported at once.
    pub fn validate(self) -> Result<NewTransaction, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.date.is_none() {
            errors.push(FieldError::new("date", "date is required"));
        }
        if self.amount <= 0 {
            errors.push(FieldError::new("amount", "amount must be a positive integer"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(NewTransaction {
            date: self.date.unwrap_or_default(),
            amount: self.amount,
            description,
            category_id: self.category_id,
        })
    }
}
