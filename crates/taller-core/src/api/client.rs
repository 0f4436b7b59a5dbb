//! HTTP client for the record service.
//!
//! Only this module talks to the network. Every call returns
//! `Result<_, ApiError>`; nothing here panics on a bad response.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use taller_types::{ListPage, RegisterFields, Session, User};

use super::error::ApiError;
use crate::config::Config;
use crate::session::{SessionStore, mask_token};

pub const USER_AGENT: &str = concat!("taller/", env!("CARGO_PKG_VERSION"));

const AUTH_WITH_PASSWORD_PATH: &str = "/api/collections/users/auth-with-password";
const USERS: &str = "users";

/// Response of the password authentication endpoint.
#[derive(Debug, serde::Deserialize)]
struct AuthResponse {
    token: String,
    record: User,
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    identity: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    #[serde(flatten)]
    fields: &'a RegisterFields,
    #[serde(rename = "emailVisibility")]
    email_visibility: bool,
}

/// Record service client.
///
/// Holds the session store so that `login` persists the session, `logout`
/// clears it, and authenticated calls pick up the current token.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    per_page: u32,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for `base_url` with no request timeout.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn SessionStore>) -> Result<Self> {
        Self::build(base_url.into(), None, 200, store)
    }

    /// Creates a client from configuration (base URL, timeout, page size).
    pub fn from_config(config: &Config, store: Arc<dyn SessionStore>) -> Result<Self> {
        let base_url = config.effective_base_url()?;
        Self::build(
            base_url,
            config.request_timeout(),
            config.effective_per_page(),
            store,
        )
    }

    fn build(
        base_url: String,
        timeout: Option<Duration>,
        per_page: u32,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            per_page: per_page.max(1),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Reads the persisted session.
    pub fn session(&self) -> Result<Option<Session>, ApiError> {
        self.store.get().map_err(|e| ApiError::storage(&e))
    }

    /// Authenticates with email and password and persists the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        tracing::info!(email, "logging in");

        let request = self.http.post(self.url(AUTH_WITH_PASSWORD_PATH)).json(&AuthRequest {
            identity: email,
            password,
        });
        let response = send(request).await?;
        let auth: AuthResponse = decode(check(response, true).await?).await?;

        let session = Session {
            token: auth.token,
            user: auth.record,
        };
        self.store.set(&session).map_err(|e| ApiError::storage(&e))?;
        tracing::info!(
            user_id = %session.user.id,
            token = %mask_token(&session.token),
            "logged in"
        );

        Ok(session.user)
    }

    /// Creates an account. Does not authenticate.
    pub async fn register(&self, fields: &RegisterFields) -> Result<User, ApiError> {
        tracing::info!(email = %fields.email, "registering account");
        let body = RegisterRequest {
            fields,
            email_visibility: true,
        };
        let request = self.http.post(self.records_url(USERS, None)).json(&body);
        let response = send(request).await?;
        decode(check(response, false).await?).await
    }

    /// Returns true if an account with this email already exists.
    pub async fn check_email_exists(&self, email: &str) -> Result<bool, ApiError> {
        let filter = format!("(email='{}')", escape_filter_value(email, '\''));
        let request = self
            .http
            .get(self.records_url(USERS, None))
            .query(&[("filter", filter.as_str()), ("perPage", "1")]);
        let response = send(request).await?;
        let page: ListPage<serde_json::Value> = decode(check(response, false).await?).await?;
        Ok(!page.items.is_empty())
    }

    /// Clears the persisted session. Returns true if one was present.
    pub fn logout(&self) -> Result<bool, ApiError> {
        let had_session = self.store.clear().map_err(|e| ApiError::storage(&e))?;
        tracing::info!(had_session, "logged out");
        Ok(had_session)
    }

    /// Lists every record in `collection` matching `filter`, following pagination.
    pub async fn list_records<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: &str,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page_no: u32 = 1;
        let mut last_page: Option<u32> = None;
        loop {
            let page_param = page_no.to_string();
            let per_page = self.per_page.to_string();
            let request = self
                .authorized(Method::GET, &self.records_url(collection, None))?
                .query(&[
                    ("filter", filter),
                    ("page", page_param.as_str()),
                    ("perPage", per_page.as_str()),
                ]);
            let page: ListPage<T> = self.execute(request).await?;
            if page_no > 1 && page.page != page_no {
                tracing::warn!(
                    collection,
                    requested = page_no,
                    got = page.page,
                    "page ignored by service"
                );
                break;
            }
            // The first page fixes the page count.
            let last_page = *last_page.get_or_insert(page.total_pages);
            let last = page.is_last() || page.items.is_empty() || page_no >= last_page;
            tracing::debug!(collection, page = page_no, count = page.items.len(), "listed");
            items.extend(page.items);
            if last {
                break;
            }
            page_no += 1;
        }
        Ok(items)
    }

    pub async fn create_record<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        collection: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorized(Method::POST, &self.records_url(collection, None))?
            .json(body);
        let record = self.execute(request).await?;
        tracing::info!(collection, "record created");
        Ok(record)
    }

    pub async fn update_record<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self
            .authorized(Method::PATCH, &self.records_url(collection, Some(id)))?
            .json(body);
        let record = self.execute(request).await?;
        tracing::info!(collection, id, "record updated");
        Ok(record)
    }

    pub async fn delete_record(&self, collection: &str, id: &str) -> Result<(), ApiError> {
        let request = self.authorized(Method::DELETE, &self.records_url(collection, Some(id)))?;
        let response = send(request).await?;
        self.check_authorized(response).await?;
        tracing::info!(collection, id, "record deleted");
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn records_url(&self, collection: &str, id: Option<&str>) -> String {
        match id {
            Some(id) => self.url(&format!("/api/collections/{collection}/records/{id}")),
            None => self.url(&format!("/api/collections/{collection}/records")),
        }
    }

    /// Builds a request carrying the stored token, if any.
    fn authorized(&self, method: Method, url: &str) -> Result<RequestBuilder, ApiError> {
        let builder = self.http.request(method, url);
        Ok(match self.session()? {
            Some(session) => builder.bearer_auth(session.token),
            None => builder,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = send(request).await?;
        decode(self.check_authorized(response).await?).await
    }

    /// Like [`check`], but a 401 means the stored token was rejected and the
    /// session is dropped.
    async fn check_authorized(&self, response: Response) -> Result<Response, ApiError> {
        match check(response, false).await {
            Err(err) if err.is_token_rejected() => {
                tracing::warn!("token rejected by the service; clearing session");
                if let Err(e) = self.store.clear() {
                    tracing::warn!("failed to clear session: {e:#}");
                }
                Err(err)
            }
            other => other,
        }
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
    request.send().await.map_err(|e| {
        let err = ApiError::from_reqwest(&e);
        tracing::debug!(kind = %err.kind, "request failed: {}", err.message);
        err
    })
}

async fn check(response: Response, auth_endpoint: bool) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = ApiError::from_status(status.as_u16(), &body, auth_endpoint);
    tracing::debug!(status = status.as_u16(), kind = %err.kind, "service rejected request");
    Err(err)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await.map_err(|e| ApiError::from_reqwest(&e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::parse(format!("Failed to parse response: {e}")))
}

/// Escapes a value for use inside a quoted filter literal.
pub(crate) fn escape_filter_value(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Builds an equality filter `field = "value"`.
pub(crate) fn eq_filter(field: &str, value: &str) -> String {
    format!("{field} = \"{}\"", escape_filter_value(value, '"'))
}
