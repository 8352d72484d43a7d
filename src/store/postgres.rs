// src/store/postgres.rs
//
// Reads the backend's tables directly. Tokens are still validated by the
// hosted auth API.

use async_trait::async_trait;
use sqlx::{query_as, PgPool};
use uuid::Uuid;

use super::{at_most_one, supabase::SupabaseAuth, Credentials, RecordStore, StoreError};
use crate::models::{Caller, Employee, Organization, Report};

pub struct PgStore {
    pool: PgPool,
    auth: SupabaseAuth,
}

impl PgStore {
    pub fn new(pool: PgPool, auth: SupabaseAuth) -> Self {
        Self { pool, auth }
    }
}

// Ids are uuid columns; anything else cannot match a row. No trimming, so
// the same ids match here as on the REST backend.
fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

#[async_trait]
impl RecordStore for PgStore {
    async fn resolve_caller(&self, credentials: &Credentials) -> Result<Option<Caller>, StoreError> {
        self.auth.get_user(credentials).await
    }

    async fn find_employee(
        &self,
        _credentials: &Credentials,
        employee_id: &str,
    ) -> Result<Option<Employee>, StoreError> {
        let Some(id) = parse_id(employee_id) else {
            return Ok(None);
        };
        let rows = query_as::<_, Employee>(
            r#"SELECT id::text AS id, organization_id::text AS organization_id
               FROM public.employees WHERE id = $1 LIMIT 2"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        at_most_one(rows, "employees")
    }

    async fn find_organization_by_owner(
        &self,
        _credentials: &Credentials,
        owner_id: &str,
    ) -> Result<Option<Organization>, StoreError> {
        let Some(owner) = parse_id(owner_id) else {
            return Ok(None);
        };
        let rows = query_as::<_, Organization>(
            r#"SELECT id::text AS id, user_id::text AS user_id
               FROM public.organization WHERE user_id = $1 LIMIT 2"#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        at_most_one(rows, "organization")
    }

    async fn list_reports_by_employee(
        &self,
        _credentials: &Credentials,
        employee_id: &str,
    ) -> Result<Vec<Report>, StoreError> {
        let Some(id) = parse_id(employee_id) else {
            return Ok(Vec::new());
        };
        let rows = query_as::<_, Report>(
            r#"
            SELECT id::text AS id,
                   employee_id::text AS employee_id,
                   month,
                   ranking,
                   improvements,
                   qualities,
                   summary,
                   to_json(created_at) #>> '{}' AS created_at
            FROM public.reports
            WHERE employee_id = $1
            ORDER BY month DESC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
