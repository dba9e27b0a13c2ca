use api_types::{
    auth::{LoginRequest, LoginResponse, RegisterRequest},
    device::DeviceRegister,
    expense::{ErrorMessage, ExpenseNew, ExpensePayload},
    group::{GroupJoin, GroupNew, GroupPayload, GroupsResponse, MemberPayload},
};
use chrono::NaiveDate;
use serde::{Serialize, de::DeserializeOwned};

use engine::{Expense, Group, Member, group_key};

use crate::error::{AppError, Result};

/// Failures of a single API call, bucketed the way the screens need them:
/// 409 and 422 bodies are preserved verbatim for user display, everything
/// else collapses to a generic category.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("server error: {0}")]
    Server(String),
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(AppError::Terminal("base_url is empty".to_string()));
        }
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn error_from_response(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        // The delete endpoint wraps its message in JSON; the group-conflict
        // endpoints answer with plain text. Either way the text reaches the
        // user untouched.
        let message = match serde_json::from_str::<ErrorMessage>(&body) {
            Ok(err) => err.message,
            Err(_) if !body.is_empty() => body,
            Err(_) => "unknown error".to_string(),
        };
        match status.as_u16() {
            401 => ClientError::Unauthorized,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(message),
            422 => ClientError::Validation(message),
            _ => ClientError::Server(message),
        }
    }

    async fn get_json<TResp: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> std::result::Result<TResp, ClientError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(response.json::<TResp>().await?);
        }
        Err(Self::error_from_response(response).await)
    }

    async fn post_json<TReq, TResp>(
        &self,
        token: Option<&str>,
        path: &str,
        body: &TReq,
    ) -> std::result::Result<TResp, ClientError>
    where
        TReq: Serialize + ?Sized,
        TResp: DeserializeOwned,
    {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response.json::<TResp>().await?);
        }
        Err(Self::error_from_response(response).await)
    }

    async fn post_json_unit<TReq: Serialize + ?Sized>(
        &self,
        token: Option<&str>,
        path: &str,
        body: &TReq,
    ) -> std::result::Result<(), ClientError> {
        let mut request = self.http.post(self.url(path)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from_response(response).await)
    }

    pub async fn login(
        &self,
        user_id: &str,
        password: &str,
    ) -> std::result::Result<LoginResponse, ClientError> {
        let payload = LoginRequest {
            user_id: user_id.to_string(),
            password: password.to_string(),
        };
        self.post_json(None, "/auth/login", &payload).await
    }

    pub async fn register(
        &self,
        name: &str,
        user_id: &str,
        password: &str,
    ) -> std::result::Result<(), ClientError> {
        let payload = RegisterRequest {
            name: name.to_string(),
            user_id: user_id.to_string(),
            password: password.to_string(),
        };
        self.post_json_unit(None, "/auth/register", &payload).await
    }

    /// Fetches every group the bearer belongs to, normalized.
    pub async fn my_groups(&self, token: &str) -> std::result::Result<Vec<Group>, ClientError> {
        let response: GroupsResponse = self.get_json(token, "/pg/my-groups").await?;
        Ok(normalize_groups(response.into_vec()))
    }

    /// Legacy singular form of [`my_groups`]; some deployments only answer
    /// this one.
    ///
    /// [`my_groups`]: Self::my_groups
    pub async fn my_group(&self, token: &str) -> std::result::Result<Group, ClientError> {
        let payload: GroupPayload = self.get_json(token, "/pg/my-group").await?;
        normalize_group(payload)
            .ok_or_else(|| ClientError::Server("group carries no identifier".to_string()))
    }

    pub async fn create_group(
        &self,
        token: &str,
        group_name: &str,
    ) -> std::result::Result<Group, ClientError> {
        let payload = GroupNew {
            group_name: group_name.to_string(),
        };
        let created: GroupPayload = self
            .post_json(Some(token), "/pg/create-group", &payload)
            .await?;
        normalize_group(created)
            .ok_or_else(|| ClientError::Server("created group carries no identifier".to_string()))
    }

    pub async fn join_group(
        &self,
        token: &str,
        group_code: &str,
        user_id: &str,
    ) -> std::result::Result<Group, ClientError> {
        let payload = GroupJoin {
            group_code: group_code.to_string(),
            user_id: user_id.to_string(),
        };
        let joined: GroupPayload = self
            .post_json(Some(token), "/pg/join-group", &payload)
            .await?;
        normalize_group(joined)
            .ok_or_else(|| ClientError::Server("joined group carries no identifier".to_string()))
    }

    /// Adds an expense to the bearer's current group; attribution happens
    /// server-side.
    pub async fn add_expense(
        &self,
        token: &str,
        expense: &ExpenseNew,
    ) -> std::result::Result<(), ClientError> {
        self.post_json_unit(Some(token), "/pg/addExpense", expense)
            .await
    }

    /// Adds an expense attributed to several groups at once; `expense`
    /// must carry the target group codes.
    pub async fn add_expense_to_groups(
        &self,
        token: &str,
        expense: &ExpenseNew,
    ) -> std::result::Result<(), ClientError> {
        self.post_json_unit(Some(token), "/pg/addExpenseToGroups", expense)
            .await
    }

    pub async fn delete_expense(
        &self,
        token: &str,
        expense_id: &str,
    ) -> std::result::Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/pg/delete/expense/{expense_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::error_from_response(response).await)
    }

    /// Best-effort push registration; callers log failures and move on.
    pub async fn register_device(
        &self,
        token: &str,
        registration: &DeviceRegister,
    ) -> std::result::Result<(), ClientError> {
        self.post_json_unit(Some(token), "/pg/register-device", registration)
            .await
    }
}

/// Collapses a wire group into the client's model, resolving the canonical
/// identifier once. Groups with no identifier at all cannot be addressed
/// and are dropped with a warning.
fn normalize_groups(payloads: Vec<GroupPayload>) -> Vec<Group> {
    payloads
        .into_iter()
        .filter_map(|payload| {
            let group = normalize_group(payload);
            if group.is_none() {
                tracing::warn!("dropping group payload with no identifier field");
            }
            group
        })
        .collect()
}

fn normalize_group(payload: GroupPayload) -> Option<Group> {
    let key = group_key(
        payload.group_code.as_deref(),
        payload.code.as_deref(),
        payload.id.as_deref(),
    )?;
    Some(Group {
        key,
        name: payload.group_name.unwrap_or_default(),
        members: payload.users.into_iter().map(normalize_member).collect(),
        expenses: payload
            .expenses
            .into_iter()
            .map(normalize_expense)
            .collect(),
    })
}

fn normalize_member(payload: MemberPayload) -> Member {
    let name = payload
        .name
        .clone()
        .or_else(|| payload.username.clone())
        .unwrap_or_else(|| payload.user_id.clone());
    Member {
        user_id: payload.user_id,
        name,
        username: payload.username,
        expenses: payload
            .expenses
            .into_iter()
            .map(normalize_expense)
            .collect(),
    }
}

fn normalize_expense(payload: ExpensePayload) -> Expense {
    Expense {
        id: payload.id.unwrap_or_default(),
        amount: payload.amount,
        description: payload.description,
        paid_by: payload.paid_by.unwrap_or_default(),
        user_id: payload.user_id,
        payment_date: payload
            .payment_date
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
        tags: payload.tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_resolves_code_only_payloads() {
        let payload: GroupPayload =
            serde_json::from_str(r#"{"code":"CD34","groupName":"Flat"}"#).unwrap();
        let group = normalize_group(payload).unwrap();
        assert_eq!(group.key, "CD34");
        assert_eq!(group.name, "Flat");
    }

    #[test]
    fn normalization_drops_identifierless_groups() {
        let payload: GroupPayload = serde_json::from_str(r#"{"groupName":"Nowhere"}"#).unwrap();
        assert!(normalize_group(payload).is_none());
    }

    #[test]
    fn bad_payment_dates_become_none() {
        let payload: ExpensePayload = serde_json::from_str(
            r#"{"id":"e1","amount":4.2,"paidBy":"7","paymentDate":"not-a-date"}"#,
        )
        .unwrap();
        let expense = normalize_expense(payload);
        assert!(expense.payment_date.is_none());
        assert_eq!(expense.amount, 4.2);
    }

    #[test]
    fn member_display_name_falls_back_to_username_then_id() {
        let payload: MemberPayload =
            serde_json::from_str(r#"{"userId":7,"username":"asha01"}"#).unwrap();
        let member = normalize_member(payload);
        assert_eq!(member.name, "asha01");

        let payload: MemberPayload = serde_json::from_str(r#"{"userId":7}"#).unwrap();
        assert_eq!(normalize_member(payload).name, "7");
    }
}
