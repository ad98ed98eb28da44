//! Client for the finance API.
//!
//! Every call goes through [`ApiClient::call`], which attaches the page's
//! credentials, holds the loading indicator for the duration of the request
//! and turns any non-2xx response into [`ApiError::Server`].

use api_types::{
    account::Account,
    budget::{Budget, BudgetNew},
    category::{CategoryDetails, CategoryWithSubcategoryCreated, CategoryWithSubcategoryNew},
    transaction::{LinkCandidate, TransactionView},
};
use reqwest::{Client, Method, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::loading::Loading;

const API_KEY_HEADER: &str = "x-api-key";

/// Credentials attached to every request.
#[derive(Clone)]
pub enum Auth {
    /// `Authorization: Bearer <token>`, token taken from the launch URL.
    Bearer(String),
    /// `X-API-Key: <key>`.
    ApiKey(String),
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(..)"),
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API Error ({status}): {message}")]
    Server { status: StatusCode, message: String },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Network(err) => err.status(),
            _ => None,
        }
    }

    /// Server detail when there is one, otherwise the error itself.
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Picks the most specific message out of an error body.
///
/// Understands `{"detail": "..."}`, `{"detail": {"message": "..."}}`,
/// validation lists (`{"detail": [{"msg": "..."}]}`) and `{"error": "..."}`.
/// Falls back to the canonical reason of `status`.
pub(crate) fn server_message(status: StatusCode, body: &[u8]) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    };

    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return fallback();
    };

    let detail = match value.get("detail") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Object(obj)) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Some(Value::Array(items)) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    };

    detail
        .or_else(|| {
            value
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(fallback)
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    loading: Loading,
}

impl ApiClient {
    pub fn new(base_url: &str, auth: Auth, loading: Loading) -> Result<Self, ApiError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|err| ApiError::InvalidRequest(format!("invalid base_url: {err}")))?;
        let (name, value) = match &auth {
            Auth::Bearer(token) => (header::AUTHORIZATION, format!("Bearer {token}")),
            Auth::ApiKey(key) => (
                header::HeaderName::from_static(API_KEY_HEADER),
                key.to_string(),
            ),
        };
        let mut value = header::HeaderValue::try_from(value)
            .map_err(|err| ApiError::InvalidRequest(format!("invalid auth header value: {err}")))?;
        value.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(name, value);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
            loading,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Sends one request and returns the decoded body, or `None` for an
    /// empty or `204 No Content` response.
    pub async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<Value>, ApiError> {
        let _loading = self.loading.acquire();
        tracing::debug!("{method} {path}");

        let mut req = self.client.request(method.clone(), self.url(path));
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let message = server_message(status, &bytes);
            tracing::warn!("{method} {path} failed with {status}: {message}");
            return Err(ApiError::Server { status, message });
        }

        if status == StatusCode::NO_CONTENT || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.call::<Value>(Method::GET, path, None).await?;
        Ok(serde_json::from_value(body.unwrap_or(Value::Null))?)
    }

    async fn send_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        self.call(method, path, Some(body)).await.map(|_| ())
    }

    pub async fn transaction_by_token(&self) -> Result<TransactionView, ApiError> {
        self.get_json("/transactions/get/by-token").await
    }

    /// Partial update of the transaction the bearer token was issued for.
    pub async fn patch_transaction_by_token(
        &self,
        changes: &Map<String, Value>,
    ) -> Result<(), ApiError> {
        self.send_unit(Method::PATCH, "/transactions/by-token", changes)
            .await
    }

    pub async fn transaction_by_hash(&self, hash: &str) -> Result<TransactionView, ApiError> {
        self.get_json(&format!("/transactions/by-hash/{hash}"))
            .await
    }

    pub async fn linkable_transactions(&self) -> Result<Vec<LinkCandidate>, ApiError> {
        self.get_json("/transactions/linkable").await
    }

    pub async fn categories(&self) -> Result<Vec<CategoryDetails>, ApiError> {
        self.get_json("/categories/all_details").await
    }

    pub async fn patch_subcategory(
        &self,
        subcategory_id: i64,
        changes: &Map<String, Value>,
    ) -> Result<(), ApiError> {
        self.send_unit(
            Method::PATCH,
            &format!("/categories/subcategories/{subcategory_id}"),
            changes,
        )
        .await
    }

    pub async fn create_category_with_subcategory(
        &self,
        payload: &CategoryWithSubcategoryNew,
    ) -> Result<CategoryWithSubcategoryCreated, ApiError> {
        let body = self
            .call(Method::POST, "/categories/create-with-subcategory", Some(payload))
            .await?;
        Ok(serde_json::from_value(body.unwrap_or(Value::Null))?)
    }

    pub async fn accounts(&self) -> Result<Vec<Account>, ApiError> {
        self.get_json("/accounts/for-mini-app").await
    }

    pub async fn patch_account(
        &self,
        account_id: i64,
        changes: &Map<String, Value>,
    ) -> Result<(), ApiError> {
        self.send_unit(Method::PATCH, &format!("/accounts/{account_id}"), changes)
            .await
    }

    /// Budget for a month, `None` when the server has none (404).
    pub async fn budget(&self, year: i32, month: u32) -> Result<Option<Budget>, ApiError> {
        match self.call::<Value>(Method::GET, &format!("/budget/{year}/{month}"), None).await {
            Ok(Some(body)) => Ok(Some(serde_json::from_value(body)?)),
            Ok(None) => Ok(None),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub async fn save_budget(&self, payload: &BudgetNew) -> Result<(), ApiError> {
        self.send_unit(Method::POST, "/budget/", payload).await
    }
}
