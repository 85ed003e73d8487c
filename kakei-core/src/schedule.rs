//! Calendar annotations: holidays and other dated entries.
//! Disjoint from the financial stores.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ScheduleKind {
    #[serde(rename = "holiday")]
    Holiday,
    #[serde(rename = "other")]
    Other,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Holiday => "holiday",
            ScheduleKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub id: String,
    pub date: NaiveDate,
    pub title: String,
    pub kind: ScheduleKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewScheduleEntry {
    pub date: NaiveDate,
    pub title: String,
    pub kind: ScheduleKind,
}

/// Dates of the holiday-kind entries, sorted ascending.
pub fn holiday_dates(entries: &[ScheduleEntry]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = entries
        .iter()
        .filter(|e| e.kind == ScheduleKind::Holiday)
        .map(|e| e.date)
        .collect();
    dates.sort();
    dates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_holiday_dates_filters_and_sorts() {
        let entries = vec![
            ScheduleEntry {
                id: "s2".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
                title: "Golden Week".to_string(),
                kind: ScheduleKind::Holiday,
            },
            ScheduleEntry {
                id: "s1".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
                title: "Golden Week".to_string(),
                kind: ScheduleKind::Holiday,
            },
            ScheduleEntry {
                id: "s3".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
                title: "Dentist".to_string(),
                kind: ScheduleKind::Other,
            },
        ];

        let dates = holiday_dates(&entries);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            ]
        );
    }
}
