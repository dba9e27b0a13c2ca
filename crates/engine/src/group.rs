use crate::{Expense, Member};

/// A group snapshot with its identifier already normalized.
///
/// `key` is the one canonical identifier used everywhere downstream; it is
/// resolved once at the wire boundary via [`group_key`], so lookup code
/// never repeats the upstream field fallback.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub key: String,
    pub name: String,
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
}

/// Resolves the canonical group identifier from the three candidate fields
/// upstream payloads use, in fixed priority order: `groupCode`, then
/// `code`, then `id`. Empty strings count as absent. Returns `None` only
/// when no candidate is present at all.
pub fn group_key(
    group_code: Option<&str>,
    code: Option<&str>,
    id: Option<&str>,
) -> Option<String> {
    [group_code, code, id]
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.is_empty())
        .map(str::to_string)
}

/// Locates a group by canonical key in a freshly fetched list.
pub fn find_group<'a>(groups: &'a [Group], key: &str) -> Option<&'a Group> {
    groups.iter().find(|group| group.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_prefers_group_code_then_code_then_id() {
        assert_eq!(
            group_key(Some("AB12"), Some("x"), Some("y")),
            Some("AB12".to_string())
        );
        assert_eq!(group_key(None, Some("CD34"), Some("y")), Some("CD34".to_string()));
        assert_eq!(group_key(None, None, Some("55")), Some("55".to_string()));
        assert_eq!(group_key(None, None, None), None);
    }

    #[test]
    fn empty_candidates_are_skipped() {
        assert_eq!(group_key(Some(""), Some("CD34"), None), Some("CD34".to_string()));
        assert_eq!(group_key(Some(""), Some(""), Some("")), None);
    }

    #[test]
    fn lookup_by_key_resolved_from_code_only_payload() {
        let key = group_key(None, Some("CD34"), None).unwrap();
        let groups = vec![Group {
            key: key.clone(),
            name: "Flat 4B".to_string(),
            ..Group::default()
        }];
        assert!(find_group(&groups, &key).is_some());
        assert!(find_group(&groups, "other").is_none());
    }
}
