use chrono::NaiveDate;

use engine::{
    Balance, Expense, Member, expenses_in_month, filtered_balances, member_balances,
    round_to_cents, share_of_total, total_expenses,
};

fn expense(paid_by: &str, amount: f64) -> Expense {
    Expense {
        id: format!("{paid_by}-{amount}"),
        amount,
        paid_by: paid_by.to_string(),
        ..Expense::default()
    }
}

fn member(user_id: &str, name: &str) -> Member {
    Member {
        user_id: user_id.to_string(),
        name: name.to_string(),
        ..Member::default()
    }
}

#[test]
fn empty_inputs_yield_empty_results() {
    assert_eq!(total_expenses(&[]), 0.0);
    assert!(member_balances(&[]).is_empty());
    assert!(filtered_balances(&[], &[]).is_empty());
}

#[test]
fn member_without_expenses_has_zero_balance() {
    let members = vec![member("1", "A")];
    assert_eq!(
        member_balances(&members),
        vec![Balance {
            user_id: "1".to_string(),
            total_spent: 0.0,
        }]
    );
    assert_eq!(
        filtered_balances(&[], &members),
        vec![Balance {
            user_id: "1".to_string(),
            total_spent: 0.0,
        }]
    );
}

#[test]
fn embedded_totals_conserve_the_expense_sum() {
    // Distribute a pool of expenses so each belongs to exactly one member;
    // the per-member totals must add back up to the pool total (to cents).
    let pool = [("1", 12.40), ("1", 7.35), ("2", 100.00), ("3", 0.99)];
    let mut alice = member("1", "A");
    let mut bob = member("2", "B");
    let mut carol = member("3", "C");
    for (payer, amount) in pool {
        let target = match payer {
            "1" => &mut alice,
            "2" => &mut bob,
            _ => &mut carol,
        };
        target.expenses.push(expense(payer, amount));
    }
    let members = vec![alice, bob, carol];

    let balances = member_balances(&members);
    let balance_sum: f64 = balances.iter().map(|b| b.total_spent).sum();
    let pool_sum: f64 = pool.iter().map(|(_, amount)| amount).sum();
    assert!((balance_sum - round_to_cents(pool_sum)).abs() < 1e-9);
}

#[test]
fn embedded_totals_are_rounded_to_cents() {
    let mut alice = member("1", "A");
    alice.expenses.push(expense("1", 0.111));
    alice.expenses.push(expense("1", 0.222));
    let balances = member_balances(&[alice]);
    assert_eq!(balances[0].total_spent, 0.33);
}

#[test]
fn filtered_totals_are_left_unrounded() {
    let members = vec![member("1", "A"), member("2", "B")];
    let expenses = vec![expense("1", 10.005), expense("2", 5.0)];

    let balances = filtered_balances(&expenses, &members);
    assert_eq!(balances[0].user_id, "1");
    assert_eq!(balances[0].total_spent, 10.005);
    assert_eq!(balances[1].total_spent, 5.0);

    let total = total_expenses(&expenses);
    assert!((total - 15.005).abs() < 1e-9);
}

#[test]
fn filtered_matching_accepts_name_or_alternate_id() {
    let mut members = vec![member("1", "Asha")];
    members[0].username = Some("asha01".to_string());

    // Payer recorded by display name.
    let by_name = expense("Asha", 4.0);
    // Payer recorded by username.
    let by_username = expense("asha01", 6.0);
    // Payer carried in the alternate identifier field only.
    let mut by_alt_id = expense("someone-else", 2.5);
    by_alt_id.user_id = Some("1".to_string());
    // A stranger's expense.
    let other = expense("2", 99.0);

    let balances = filtered_balances(&[by_name, by_username, by_alt_id, other], &members);
    assert!((balances[0].total_spent - 12.5).abs() < 1e-9);
}

#[test]
fn zero_total_yields_zero_share() {
    assert_eq!(share_of_total(0.0, 0.0), 0.0);
    assert_eq!(share_of_total(10.0, 0.0), 0.0);
    assert!((share_of_total(5.0, 20.0) - 25.0).abs() < 1e-9);
}

#[test]
fn month_scope_feeds_the_filtered_path() {
    let members = vec![member("1", "A"), member("2", "B")];
    let mut in_august = expense("1", 10.0);
    in_august.payment_date = NaiveDate::from_ymd_opt(2026, 8, 3);
    let mut in_july = expense("2", 40.0);
    in_july.payment_date = NaiveDate::from_ymd_opt(2026, 7, 28);

    let scoped = expenses_in_month(
        &[in_august, in_july],
        engine::Month { year: 2026, month: 8 },
    );
    let balances = filtered_balances(&scoped, &members);
    assert_eq!(balances[0].total_spent, 10.0);
    assert_eq!(balances[1].total_spent, 0.0);
}
