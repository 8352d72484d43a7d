// src/store/supabase.rs
//
// Hosted backend: auth API (`/auth/v1`) plus the REST interface over the
// tables (`/rest/v1`). Requests carry the caller's own token so the
// backend's row-level security applies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::{at_most_one, Credentials, RecordStore, StoreError};
use crate::models::{Caller, Employee, Organization, Report};

const REPORT_COLUMNS: &str =
    "id,employee_id,month,ranking,improvements,qualities,summary,created_at";

/// Client for the auth API. Also used by the Postgres store, which has no
/// way to validate tokens on its own.
#[derive(Clone)]
pub struct SupabaseAuth {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(http: Client, base_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub fn connect(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(http, base_url, anon_key))
    }

    fn authorized(&self, req: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(&credentials.access_token)
    }

    /// GET /auth/v1/user
    pub async fn get_user(&self, credentials: &Credentials) -> Result<Option<Caller>, StoreError> {
        let url = format!("{}/auth/v1/user", self.base_url);
        let resp = self
            .authorized(self.http.get(&url), credentials)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(Some(resp.json::<Caller>().await?));
        }
        if status.is_client_error() {
            tracing::debug!(%status, "auth API rejected token");
            return Ok(None);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::UnexpectedStatus { status, body })
    }
}

pub struct SupabaseStore {
    auth: SupabaseAuth,
}

impl SupabaseStore {
    pub fn new(auth: SupabaseAuth) -> Self {
        Self { auth }
    }

    async fn select<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let url = format!("{}/rest/v1/{}", self.auth.base_url, table);
        let resp = self
            .auth
            .authorized(self.auth.http.get(&url), credentials)
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::UnexpectedStatus { status, body });
        }
        Ok(resp.json::<Vec<T>>().await?)
    }
}

/// Query string for `select=<columns>&<column>=eq.<value>`, optionally
/// ordered and limited.
fn rest_query(
    columns: &str,
    column: &'static str,
    value: &str,
    order: Option<&str>,
    limit: Option<usize>,
) -> Vec<(&'static str, String)> {
    let mut q = vec![("select", columns.to_string()), (column, format!("eq.{value}"))];
    if let Some(order) = order {
        q.push(("order", order.to_string()));
    }
    if let Some(limit) = limit {
        q.push(("limit", limit.to_string()));
    }
    q
}

#[async_trait]
impl RecordStore for SupabaseStore {
    async fn resolve_caller(&self, credentials: &Credentials) -> Result<Option<Caller>, StoreError> {
        self.auth.get_user(credentials).await
    }

    async fn find_employee(
        &self,
        credentials: &Credentials,
        employee_id: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let q = rest_query("id,organization_id", "id", employee_id, None, Some(2));
        let rows = self.select::<Employee>(credentials, "employees", &q).await?;
        at_most_one(rows, "employees")
    }

    async fn find_organization_by_owner(
        &self,
        credentials: &Credentials,
        owner_id: &str,
    ) -> Result<Option<Organization>, StoreError> {
        let q = rest_query("id,user_id", "user_id", owner_id, None, Some(2));
        let rows = self.select::<Organization>(credentials, "organization", &q).await?;
        at_most_one(rows, "organization")
    }

    async fn list_reports_by_employee(
        &self,
        credentials: &Credentials,
        employee_id: &str,
    ) -> Result<Vec<Report>, StoreError> {
        let q = rest_query(REPORT_COLUMNS, "employee_id", employee_id, Some("month.desc"), None);
        self.select::<Report>(credentials, "reports", &q).await
    }
}
