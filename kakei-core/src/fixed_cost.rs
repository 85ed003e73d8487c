//! Recurring fixed-cost templates and their ledger projection.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;
use crate::ledger::NewTransaction;
use crate::month::days_in_month;

/// How often a fixed cost recurs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Recurrence {
    #[serde(rename = "monthly")]
    Monthly,
    #[serde(rename = "yearly")]
    Yearly,
}

impl Recurrence {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monthly" => Some(Recurrence::Monthly),
            "yearly" => Some(Recurrence::Yearly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }
}

/// A recurring-charge rule. It is never itself a ledger entry; `materialize`
/// projects it onto concrete dates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FixedCostTemplate {
    pub id: String,
    pub owner_id: String,
    pub description: String,
    pub amount: i64,
    pub category_id: String,
    pub recurrence: Recurrence,
    /// Day of month the charge executes, 1-31.
    pub execution_day: u32,
}

/// A validated template ready for insert or update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewFixedCost {
    pub description: String,
    pub amount: i64,
    pub category_id: String,
    pub recurrence: Recurrence,
    pub execution_day: u32,
}

/// Form-level input for creating or editing a fixed cost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixedCostDraft {
    pub description: String,
    pub amount: i64,
    pub category_id: Option<String>,
    pub recurrence: Option<Recurrence>,
    pub execution_day: u32,
}

impl FixedCostDraft {
    /// Per-field validation: every offending field is reported at once.
    pub fn validate(self) -> Result<NewFixedCost, Vec<FieldError>> {
        let mut errors = Vec::new();

        let description = self.description.trim().to_string();
        if description.is_empty() {
            errors.push(FieldError::new("description", "description is required"));
        }
        if self.amount <= 0 {
            errors.push(FieldError::new("amount", "amount must be a positive integer"));
        }
        if self.category_id.is_none() {
            errors.push(FieldError::new("category", "a category is required"));
        }
        if self.recurrence.is_none() {
            errors.push(FieldError::new("recurrence", "must be monthly or yearly"));
        }
        if !(1..=31).contains(&self.execution_day) {
            errors.push(FieldError::new("execution_day", "must be between 1 and 31"));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewFixedCost {
            description,
            amount: self.amount,
            category_id: self.category_id.unwrap_or_default(),
            recurrence: self.recurrence.unwrap_or(Recurrence::Monthly),
            execution_day: self.execution_day,
        })
    }
}

/// Project a template onto a concrete date.
///
/// Monthly templates fire when `on` is the execution day, clamped to the
/// month's length (a day-31 rule fires on Feb 29/28). Yearly templates carry
/// no month column, so they fire in January. Intended to be driven by an
/// external scheduler, once per day.
pub fn materialize(template: &FixedCostTemplate, on: NaiveDate) -> Option<NewTransaction> {
    let in_cycle = match template.recurrence {
        Recurrence::Monthly => true,
        Recurrence::Yearly => on.month() == 1,
    };
    if !in_cycle {
        return None;
    }

    let day = template.execution_day.min(days_in_month(on.year(), on.month()));
    if on.day() != day {
        return None;
    }

    Some(NewTransaction {
        date: on,
        amount: template.amount,
        description: Some(template.description.clone()),
        category_id: Some(template.category_id.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(recurrence: Recurrence, execution_day: u32) -> FixedCostTemplate {
        FixedCostTemplate {
            id: "fc-1".to_string(),
            owner_id: "u1".to_string(),
            description: "Rent".to_string(),
            amount: 80000,
            category_id: "c-housing".to_string(),
            recurrence,
            execution_day,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_fires_on_execution_day() {
        let t = template(Recurrence::Monthly, 27);
        let tx = materialize(&t, date(2024, 5, 27)).unwrap();
        assert_eq!(tx.amount, 80000);
        assert_eq!(tx.category_id.as_deref(), Some("c-housing"));
        assert!(materialize(&t, date(2024, 5, 26)).is_none());
    }

    #[test]
    fn test_day_31_clamps_to_short_months() {
        let t = template(Recurrence::Monthly, 31);
        assert!(materialize(&t, date(2024, 2, 29)).is_some());
        assert!(materialize(&t, date(2025, 2, 28)).is_some());
        assert!(materialize(&t, date(2025, 2, 27)).is_none());
        assert!(materialize(&t, date(2025, 4, 30)).is_some());
    }

    #[test]
    fn test_yearly_fires_only_in_january() {
        let t = template(Recurrence::Yearly, 15);
        assert!(materialize(&t, date(2025, 1, 15)).is_some());
        assert!(materialize(&t, date(2025, 6, 15)).is_none());
    }

    #[test]
    fn test_draft_validation_reports_each_field() {
        let draft = FixedCostDraft {
            description: " ".to_string(),
            amount: 0,
            category_id: None,
            recurrence: None,
            execution_day: 32,
        };
        let errors = draft.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["description", "amount", "category", "recurrence", "execution_day"]
        );
    }

    #[test]
    fn test_recurrence_round_trip() {
        assert_eq!(Recurrence::parse("monthly"), Some(Recurrence::Monthly));
        assert_eq!(Recurrence::parse("yearly"), Some(Recurrence::Yearly));
        assert_eq!(Recurrence::parse("weekly"), None);
        assert_eq!(Recurrence::Monthly.as_str(), "monthly");
    }
}
