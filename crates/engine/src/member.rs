use crate::Expense;

/// A user inside a group, as the client models it.
///
/// `user_id` is always held in string form; the upstream API sends it as
/// either a string or a number, and the wire layer coerces before building
/// this record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Member {
    pub user_id: String,
    pub name: String,
    pub username: Option<String>,
    /// Expenses paid by this member, present when the group payload embeds
    /// them per user; empty otherwise.
    pub expenses: Vec<Expense>,
}
