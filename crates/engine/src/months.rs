use chrono::{Datelike, NaiveDate};

use crate::Expense;

/// A calendar month, used as a dashboard scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Month {
    pub year: i32,
    /// 1-based, January = 1.
    pub month: u32,
}

impl Month {
    /// The month containing the given date.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The previous calendar month, crossing year boundaries.
    #[must_use]
    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The next calendar month, crossing year boundaries.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Whether the given date falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Human label, e.g. "August 2026".
    #[must_use]
    pub fn label(self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%B %Y").to_string(),
            None => format!("{}-{:02}", self.year, self.month),
        }
    }
}

/// Restricts an expense list to one calendar month. Expenses without a
/// parseable date never match.
pub fn expenses_in_month(expenses: &[Expense], month: Month) -> Vec<Expense> {
    expenses
        .iter()
        .filter(|expense| {
            expense
                .payment_date
                .is_some_and(|date| month.contains(date))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(day_iso: &str, amount: f64) -> Expense {
        Expense {
            id: day_iso.to_string(),
            amount,
            paid_by: "1".to_string(),
            payment_date: NaiveDate::parse_from_str(day_iso, "%Y-%m-%d").ok(),
            ..Expense::default()
        }
    }

    #[test]
    fn stepping_crosses_year_boundaries() {
        let jan = Month { year: 2026, month: 1 };
        assert_eq!(jan.prev(), Month { year: 2025, month: 12 });
        let dec = Month { year: 2025, month: 12 };
        assert_eq!(dec.next(), Month { year: 2026, month: 1 });
    }

    #[test]
    fn filter_keeps_only_the_requested_month() {
        let expenses = vec![
            dated("2026-08-01", 10.0),
            dated("2026-07-31", 5.0),
            dated("2025-08-15", 2.0),
        ];
        let august = Month { year: 2026, month: 8 };
        let filtered = expenses_in_month(&expenses, august);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].amount, 10.0);
    }

    #[test]
    fn dateless_expenses_never_match() {
        let expense = Expense {
            id: "x".to_string(),
            amount: 3.0,
            paid_by: "1".to_string(),
            payment_date: None,
            ..Expense::default()
        };
        let month = Month { year: 2026, month: 8 };
        assert!(expenses_in_month(&[expense], month).is_empty());
    }
}
