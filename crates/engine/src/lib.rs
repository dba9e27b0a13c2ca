//! Core logic for the tally client.
//!
//! Everything here is pure and synchronous: the balance calculator, the
//! domain records it operates on, calendar-month scoping, amount parsing
//! and the bearer-token identity decoder. Network traffic and persistence
//! live in the client crate; this crate never performs I/O.

pub use balances::{
    Balance, expense_matches_member, filtered_balances, member_balances, share_of_total,
    total_expenses,
};
pub use error::EngineError;
pub use expense::{Expense, normalize_tags};
pub use group::{Group, find_group, group_key};
pub use member::Member;
pub use money::{parse_amount, round_to_cents};
pub use months::{Month, expenses_in_month};
pub use session::decode_user_id;

mod balances;
mod error;
mod expense;
mod group;
mod member;
mod money;
mod months;
mod session;
