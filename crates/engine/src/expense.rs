use chrono::NaiveDate;

/// A single logged expense.
///
/// `paid_by` carries whatever the server sent for the payer: a user id on
/// newer records, a display name on older ones. `user_id` is the alternate
/// payer-identifier field some payloads include. Matching an expense
/// against a member goes through [`expense_matches_member`].
///
/// [`expense_matches_member`]: crate::expense_matches_member
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expense {
    pub id: String,
    pub amount: f64,
    pub description: Option<String>,
    pub paid_by: String,
    pub user_id: Option<String>,
    /// Calendar date of the payment; `None` when the upstream value did
    /// not parse as `YYYY-MM-DD`. Dateless expenses count toward all-time
    /// totals but never fall inside a month scope.
    pub payment_date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

/// Normalizes user-entered tags: trimmed, lowercased, empties dropped,
/// duplicates removed with first-seen order preserved.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() || out.contains(&tag) {
            continue;
        }
        out.push(tag);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_lowercased_and_deduplicated() {
        let tags = normalize_tags(["Milk", "  grocery ", "milk", "", "  "]);
        assert_eq!(tags, vec!["milk".to_string(), "grocery".to_string()]);
    }

    #[test]
    fn empty_input_yields_no_tags() {
        assert!(normalize_tags(Vec::<String>::new()).is_empty());
    }
}
