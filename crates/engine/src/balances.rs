//! The balance calculator.
//!
//! Two aggregation paths exist and are not interchangeable: call sites
//! depend on their different semantics. [`member_balances`] walks each
//! member's own embedded expense list and rounds to cents;
//! [`filtered_balances`] attributes a flat expense list (typically one
//! month's worth) to members through a permissive identity match and
//! returns raw sums. Both are total functions: missing data means a zero
//! balance, never an error.

use crate::{Expense, Member, round_to_cents};

/// A member's aggregate spend within an expense set. Derived on every
/// relevant state change, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct Balance {
    pub user_id: String,
    pub total_spent: f64,
}

/// Per-member aggregation over each member's embedded expense list.
///
/// Yields one entry per member, `0.0` for members with no expenses.
/// Totals are rounded to cents; this is the only aggregation path that
/// rounds (see [`filtered_balances`]).
pub fn member_balances(members: &[Member]) -> Vec<Balance> {
    members
        .iter()
        .map(|member| {
            let total: f64 = member.expenses.iter().map(|expense| expense.amount).sum();
            Balance {
                user_id: member.user_id.clone(),
                total_spent: round_to_cents(total),
            }
        })
        .collect()
}

/// Per-member aggregation over a flat expense list.
///
/// Each member's total is the sum of the expenses matching them under
/// [`expense_matches_member`]. Unlike [`member_balances`], sums are left
/// unrounded; callers format for display.
pub fn filtered_balances(expenses: &[Expense], members: &[Member]) -> Vec<Balance> {
    members
        .iter()
        .map(|member| {
            let total: f64 = expenses
                .iter()
                .filter(|expense| expense_matches_member(expense, member))
                .map(|expense| expense.amount)
                .sum();
            Balance {
                user_id: member.user_id.clone(),
                total_spent: total,
            }
        })
        .collect()
}

/// Whether an expense is attributable to a member.
///
/// The upstream API identifies payers inconsistently: sometimes by id,
/// sometimes by display name or username, and ids arrive as strings or
/// numbers. Both sides are therefore compared in string form, and the
/// match succeeds on any of the candidate fields. Keep every such
/// comparison behind this one function.
pub fn expense_matches_member(expense: &Expense, member: &Member) -> bool {
    if expense.paid_by == member.user_id {
        return true;
    }
    if expense.user_id.as_deref() == Some(member.user_id.as_str()) {
        return true;
    }
    if expense.paid_by == member.name {
        return true;
    }
    matches!(&member.username, Some(username) if expense.paid_by == *username)
}

/// Sum of amounts over an arbitrary expense collection. Unrounded.
pub fn total_expenses(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Percentage of the group total a single spend represents.
///
/// A zero (or negative) total yields `0.0`, never `NaN` or infinity.
#[must_use]
pub fn share_of_total(spent: f64, total: f64) -> f64 {
    if total > 0.0 { spent / total * 100.0 } else { 0.0 }
}
