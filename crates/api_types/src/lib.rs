//! Request/response bodies for the remote expense-splitting API.
//!
//! The upstream service is loose about types: identifiers arrive as
//! strings or numbers, a group's identifier may live in any of three
//! fields, and list endpoints occasionally return a bare object instead
//! of an array. The shapes here absorb all of that at the wire boundary
//! so the rest of the client works with defined defaults.

use serde::{Deserialize, Serialize};

/// Deserializes a value the server sends as either a JSON string or a
/// JSON number into a `String`.
mod string_or_number {
    use serde::{Deserialize, Deserializer, de};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(value) => Ok(value),
            Value::Number(value) => Ok(value.to_string()),
            other => Err(de::Error::custom(format!(
                "expected string or number, got {other}"
            ))),
        }
    }
}

/// Same as [`string_or_number`], for optional fields.
mod opt_string_or_number {
    use serde::{Deserialize, Deserializer, de};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(Value::Number(value)) => Ok(Some(value.to_string())),
            Some(other) => Err(de::Error::custom(format!(
                "expected string or number, got {other}"
            ))),
        }
    }
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoginRequest {
        pub user_id: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterRequest {
        pub name: String,
        pub user_id: String,
        pub password: String,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupNew {
        pub group_name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupJoin {
        pub group_code: String,
        pub user_id: String,
    }

    /// A group as the server returns it.
    ///
    /// The identifier may arrive in `groupCode`, `code` or `id` depending
    /// on the endpoint and record age; all three are kept here and
    /// collapsed to one canonical key when the payload is normalized.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupPayload {
        #[serde(default)]
        pub group_code: Option<String>,
        #[serde(default)]
        pub code: Option<String>,
        #[serde(default, deserialize_with = "crate::opt_string_or_number::deserialize")]
        pub id: Option<String>,
        #[serde(default)]
        pub group_name: Option<String>,
        #[serde(default)]
        pub users: Vec<MemberPayload>,
        #[serde(default)]
        pub expenses: Vec<super::expense::ExpensePayload>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MemberPayload {
        #[serde(default, deserialize_with = "crate::string_or_number::deserialize")]
        pub user_id: String,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub username: Option<String>,
        #[serde(default)]
        pub expenses: Vec<super::expense::ExpensePayload>,
    }

    /// The groups endpoint normally returns an array but degrades to a
    /// bare object when the user belongs to a single group.
    #[derive(Debug, Deserialize)]
    #[serde(untagged)]
    pub enum GroupsResponse {
        Many(Vec<GroupPayload>),
        One(GroupPayload),
    }

    impl GroupsResponse {
        pub fn into_vec(self) -> Vec<GroupPayload> {
            match self {
                Self::Many(groups) => groups,
                Self::One(group) => vec![group],
            }
        }
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpensePayload {
        #[serde(default, deserialize_with = "crate::opt_string_or_number::deserialize")]
        pub id: Option<String>,
        #[serde(default)]
        pub amount: f64,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default, deserialize_with = "crate::opt_string_or_number::deserialize")]
        pub paid_by: Option<String>,
        #[serde(default, deserialize_with = "crate::opt_string_or_number::deserialize")]
        pub user_id: Option<String>,
        /// `YYYY-MM-DD`; parsed (and possibly rejected) at the boundary.
        #[serde(default)]
        pub payment_date: Option<String>,
        #[serde(default)]
        pub tags: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub amount: f64,
        pub payment_date: String,
        pub tags: Vec<String>,
        /// Groups to attribute the expense to; omitted for the
        /// single-group endpoint, which attributes server-side.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub group_codes: Option<Vec<String>>,
    }

    /// Error body shape used by the delete endpoint.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorMessage {
        pub message: String,
    }
}

pub mod device {
    use super::*;

    /// Best-effort push-notification registration.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct DeviceRegister {
        pub user_id: String,
        /// The push token, not the bearer token.
        pub token: String,
        pub group_codes: Vec<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::group::{GroupsResponse, MemberPayload};

    #[test]
    fn user_id_accepts_string_or_number() {
        let from_string: MemberPayload =
            serde_json::from_str(r#"{"userId":"7","name":"A"}"#).unwrap();
        let from_number: MemberPayload =
            serde_json::from_str(r#"{"userId":7,"name":"A"}"#).unwrap();
        assert_eq!(from_string.user_id, from_number.user_id);
    }

    #[test]
    fn groups_response_tolerates_a_bare_object() {
        let single: GroupsResponse =
            serde_json::from_str(r#"{"groupCode":"AB12","groupName":"Flat"}"#).unwrap();
        assert_eq!(single.into_vec().len(), 1);

        let many: GroupsResponse =
            serde_json::from_str(r#"[{"groupCode":"AB12"},{"code":"CD34"}]"#).unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn expense_payload_defaults_missing_fields() {
        let expense: super::expense::ExpensePayload =
            serde_json::from_str(r#"{"id":3,"amount":12.5,"paidBy":7}"#).unwrap();
        assert_eq!(expense.id.as_deref(), Some("3"));
        assert_eq!(expense.paid_by.as_deref(), Some("7"));
        assert!(expense.tags.is_empty());
        assert!(expense.payment_date.is_none());
    }
}
