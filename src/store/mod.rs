// src/store/mod.rs
//
// Read access to the hosted backend. The reports handler only talks to
// `RecordStore`, so the backend can be swapped (REST, direct Postgres, or
// the in-memory fake used by tests).

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{Caller, Employee, Organization, Report};

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod supabase;

/// Access token presented by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self { access_token: token.into() }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("expected a single row from `{table}`, got several")]
    Ambiguous { table: &'static str },
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Resolves the caller behind `credentials`. `Ok(None)` means the
    /// credentials were rejected.
    async fn resolve_caller(&self, credentials: &Credentials) -> Result<Option<Caller>, StoreError>;

    async fn find_employee(
        &self,
        credentials: &Credentials,
        employee_id: &str,
    ) -> Result<Option<Employee>, StoreError>;

    /// Organization whose `user_id` is `owner_id`.
    async fn find_organization_by_owner(
        &self,
        credentials: &Credentials,
        owner_id: &str,
    ) -> Result<Option<Organization>, StoreError>;

    /// All reports of an employee, newest `month` first.
    async fn list_reports_by_employee(
        &self,
        credentials: &Credentials,
        employee_id: &str,
    ) -> Result<Vec<Report>, StoreError>;
}

/// Collapses a lookup that must match at most one row.
pub(crate) fn at_most_one<T>(mut rows: Vec<T>, table: &'static str) -> Result<Option<T>, StoreError> {
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        _ => Err(StoreError::Ambiguous { table }),
    }
}
