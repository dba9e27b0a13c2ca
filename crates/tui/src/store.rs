//! The current-group snapshot and its synchronization contract.
//!
//! `GroupStore` holds the one authoritative in-memory copy of the group
//! being viewed. The remote list always wins: every mutation is followed
//! by a full re-fetch, and the expense list is never patched locally.
//! Derived numbers (balances, totals, the viewer's own spend) are
//! recomputed whenever the snapshot, the identity or the scope changes.

use engine::{
    Balance, Expense, Group, Month, expenses_in_month, filtered_balances, find_group,
    member_balances, total_expenses,
};

use crate::client::{ApiClient, ClientError};

/// Which slice of the expense list the derived numbers describe.
///
/// The two scopes feed different aggregation paths: all-time views use the
/// per-member embedded lists (cent-rounded), month views use the filtered
/// flat list (unrounded).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    AllTime,
    Month(Month),
}

#[derive(Debug, Default)]
pub struct GroupStore {
    current: Option<Group>,
    /// Distinguishes "not yet loaded" from "loaded and the user belongs to
    /// no group".
    loaded: bool,
    /// Set when a refresh succeeded but the remote list no longer contains
    /// the selected group. The last-known snapshot is kept and the
    /// condition is surfaced, not silently ignored.
    stale: bool,
    scope: Scope,
    balances: Vec<Balance>,
    total_spent: f64,
    current_balance: f64,
}

impl GroupStore {
    pub fn current(&self) -> Option<&Group> {
        self.current.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn balances(&self) -> &[Balance] {
        &self.balances
    }

    pub fn total_spent(&self) -> f64 {
        self.total_spent
    }

    /// The logged-in member's own total within the active scope.
    pub fn current_balance(&self) -> f64 {
        self.current_balance
    }

    /// The expense list restricted to the active scope, for display.
    pub fn scoped_expenses(&self) -> Vec<Expense> {
        match (&self.current, self.scope) {
            (Some(group), Scope::AllTime) => group.expenses.clone(),
            (Some(group), Scope::Month(month)) => expenses_in_month(&group.expenses, month),
            (None, _) => Vec::new(),
        }
    }

    /// Scoped expenses in display order (newest first, i.e. server order
    /// reversed). Selection indices refer to this ordering.
    pub fn visible_expenses(&self) -> Vec<Expense> {
        let mut expenses = self.scoped_expenses();
        expenses.reverse();
        expenses
    }

    /// Initial load: fetch all groups, restore the persisted selection when
    /// it still exists, otherwise fall back to the first group. Returns the
    /// selected group's key so the caller can persist it.
    ///
    /// A fetch failure here leaves the store explicitly empty; later
    /// refresh failures keep the last-known snapshot instead.
    pub async fn load_initial(
        &mut self,
        client: &ApiClient,
        token: &str,
        preferred: Option<&str>,
        user_id: Option<&str>,
    ) -> Option<String> {
        let groups = match client.my_groups(token).await {
            Ok(groups) => groups,
            Err(err) => {
                tracing::warn!("initial group load failed: {err}");
                Vec::new()
            }
        };

        let chosen = preferred
            .and_then(|key| find_group(&groups, key).cloned())
            .or_else(|| groups.into_iter().next());

        self.loaded = true;
        self.stale = false;
        self.current = chosen;
        self.recompute(user_id);
        self.current.as_ref().map(|group| group.key.clone())
    }

    /// Full resynchronization after a mutation: re-fetch the authoritative
    /// list and replace the snapshot with the entry matching the current
    /// key. Nothing is considered valid until this has run.
    pub async fn refresh(&mut self, client: &ApiClient, token: &str, user_id: Option<&str>) {
        let Some(key) = self.current.as_ref().map(|group| group.key.clone()) else {
            tracing::warn!("no current group selected to refresh");
            return;
        };
        let result = client.my_groups(token).await;
        self.apply_refresh(&key, result, user_id);
    }

    /// Applies an already-fetched refresh result. Split from [`refresh`]
    /// so the failure contract is testable without a server.
    ///
    /// [`refresh`]: Self::refresh
    fn apply_refresh(
        &mut self,
        key: &str,
        result: std::result::Result<Vec<Group>, ClientError>,
        user_id: Option<&str>,
    ) {
        match result {
            Ok(groups) => match find_group(&groups, key) {
                Some(group) => {
                    self.current = Some(group.clone());
                    self.stale = false;
                }
                None => {
                    tracing::warn!(key, "current group not found in user's groups");
                    self.stale = true;
                }
            },
            Err(err) => {
                // Keep the last-known snapshot; the worst case is a stale
                // view, never a cleared one.
                tracing::warn!("group refresh failed: {err}");
            }
        }
        self.recompute(user_id);
    }

    /// Switches to an explicitly chosen group. Returns the key for the
    /// caller to persist.
    pub fn select(&mut self, group: Group, user_id: Option<&str>) -> String {
        let key = group.key.clone();
        self.current = Some(group);
        self.loaded = true;
        self.stale = false;
        self.recompute(user_id);
        key
    }

    pub fn set_scope(&mut self, scope: Scope, user_id: Option<&str>) {
        self.scope = scope;
        self.recompute(user_id);
    }

    /// Drops all group state (logout).
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn recompute(&mut self, user_id: Option<&str>) {
        let Some(group) = &self.current else {
            self.balances.clear();
            self.total_spent = 0.0;
            self.current_balance = 0.0;
            return;
        };

        match self.scope {
            Scope::AllTime => {
                self.balances = member_balances(&group.members);
                self.total_spent = total_expenses(&group.expenses);
            }
            Scope::Month(month) => {
                let scoped = expenses_in_month(&group.expenses, month);
                self.balances = filtered_balances(&scoped, &group.members);
                self.total_spent = total_expenses(&scoped);
            }
        }

        self.current_balance = user_id
            .and_then(|id| self.balances.iter().find(|balance| balance.user_id == id))
            .map(|balance| balance.total_spent)
            .unwrap_or(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::Member;

    fn group(key: &str, expense_amounts: &[(&str, f64)]) -> Group {
        Group {
            key: key.to_string(),
            name: format!("group {key}"),
            members: vec![
                Member {
                    user_id: "1".to_string(),
                    name: "A".to_string(),
                    ..Member::default()
                },
                Member {
                    user_id: "2".to_string(),
                    name: "B".to_string(),
                    ..Member::default()
                },
            ],
            expenses: expense_amounts
                .iter()
                .enumerate()
                .map(|(i, (payer, amount))| Expense {
                    id: format!("e{i}"),
                    amount: *amount,
                    paid_by: (*payer).to_string(),
                    ..Expense::default()
                })
                .collect(),
        }
    }

    fn store_with(group: Group) -> GroupStore {
        let mut store = GroupStore::default();
        store.select(group, Some("1"));
        store
    }

    #[test]
    fn refresh_failure_keeps_the_snapshot() {
        let mut store = store_with(group("AB12", &[("1", 10.0)]));
        store.apply_refresh(
            "AB12",
            Err(ClientError::Server("boom".to_string())),
            Some("1"),
        );
        assert_eq!(store.current().map(|g| g.key.as_str()), Some("AB12"));
        assert!(!store.is_stale());
    }

    #[test]
    fn refresh_replaces_the_snapshot_on_match() {
        let mut store = store_with(group("AB12", &[("1", 10.0)]));
        let refreshed = vec![group("AB12", &[("1", 10.0), ("2", 4.0)])];
        store.apply_refresh("AB12", Ok(refreshed), Some("1"));
        let current = store.current().expect("snapshot");
        assert_eq!(current.expenses.len(), 2);
        assert!(!store.is_stale());
    }

    #[test]
    fn refresh_marks_stale_when_group_disappears() {
        let mut store = store_with(group("AB12", &[("1", 10.0)]));
        store.apply_refresh("AB12", Ok(vec![group("ZZ99", &[])]), Some("1"));
        // Old snapshot kept, condition surfaced.
        assert_eq!(store.current().map(|g| g.key.as_str()), Some("AB12"));
        assert!(store.is_stale());
    }

    #[test]
    fn all_time_scope_uses_rounded_member_balances() {
        let mut g = group("AB12", &[]);
        g.members[0].expenses = vec![
            Expense {
                id: "e1".to_string(),
                amount: 0.111,
                paid_by: "1".to_string(),
                ..Expense::default()
            },
            Expense {
                id: "e2".to_string(),
                amount: 0.222,
                paid_by: "1".to_string(),
                ..Expense::default()
            },
        ];
        let mut store = store_with(g);
        store.set_scope(Scope::AllTime, Some("1"));
        assert_eq!(store.balances()[0].total_spent, 0.33);
        assert_eq!(store.current_balance(), 0.33);
    }

    #[test]
    fn month_scope_uses_unrounded_filtered_balances() {
        use chrono::NaiveDate;

        let mut g = group("AB12", &[("1", 10.005), ("2", 5.0)]);
        for expense in &mut g.expenses {
            expense.payment_date = NaiveDate::from_ymd_opt(2026, 8, 3);
        }
        let mut store = store_with(g);
        store.set_scope(
            Scope::Month(Month {
                year: 2026,
                month: 8,
            }),
            Some("1"),
        );
        assert_eq!(store.balances()[0].total_spent, 10.005);
        assert_eq!(store.current_balance(), 10.005);
        assert!((store.total_spent() - 15.005).abs() < 1e-9);
    }

    #[test]
    fn empty_store_reports_loaded_only_after_a_load() {
        let store = GroupStore::default();
        assert!(!store.is_loaded());
        assert!(store.current().is_none());
        assert_eq!(store.total_spent(), 0.0);
    }
}
